//! Goal templates with `?` placeholders, and the prepared query form.
//!
//! A template is scanned once, left to right, tracking quote state.
//! Outside quotes, `?` followed by identifier characters is a named
//! placeholder and a bare `?` is anonymous; both consume from one shared
//! positional argument stream (the name is documentation, not a lookup
//! key). `??` collapses to a single literal `?`, inside quotes as well,
//! matching the engine-facing escape convention. Substitution itself
//! never happens inside `'...'` or `"..."` (doubled quote characters there
//! are literal quotes, not delimiters).

use std::ops::Range;

use crate::convert::ConversionPolicy;
use crate::error::{PrologError, Result};
use crate::pretty;
use crate::prover::Prover;
use crate::solution::Solution;
use crate::value::Value;

/// One piece of a scanned template: literal text, or a placeholder slot.
#[derive(Clone, Debug, PartialEq)]
enum Segment {
    Text(String),
    Hole {
        /// `?Name` carries a name; a bare `?` is anonymous.
        name: Option<String>,
        /// Character span of the placeholder in the original template.
        span: Range<usize>,
    },
}

/// A goal template scanned into literal text and placeholder slots.
/// Built once per distinct template; immutable; reused across repeated
/// executions of a `Query`.
#[derive(Clone, Debug)]
pub struct GoalTemplate {
    source: String,
    segments: Vec<Segment>,
    holes: usize,
}

impl GoalTemplate {
    /// Scan a template. Scanning never fails: malformed goal syntax is the
    /// engine reader's to reject, at execution time.
    pub fn parse(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut segments = Vec::new();
        let mut buf = String::new();
        let mut holes = 0;
        let mut quote: Option<char> = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match quote {
                Some(q) => {
                    if c == '?' && chars.get(i + 1) == Some(&'?') {
                        buf.push('?');
                        i += 2;
                        continue;
                    }
                    buf.push(c);
                    if c == q {
                        if chars.get(i + 1) == Some(&q) {
                            // Doubled quote character: a literal quote
                            buf.push(q);
                            i += 2;
                            continue;
                        }
                        quote = None;
                    }
                    i += 1;
                }
                None => match c {
                    '\'' | '"' => {
                        quote = Some(c);
                        buf.push(c);
                        i += 1;
                    }
                    '?' => {
                        if chars.get(i + 1) == Some(&'?') {
                            buf.push('?');
                            i += 2;
                            continue;
                        }
                        let start = i;
                        let mut j = i + 1;
                        while j < chars.len()
                            && (chars[j].is_ascii_alphanumeric() || chars[j] == '_')
                        {
                            j += 1;
                        }
                        let name = if j > i + 1 {
                            Some(chars[i + 1..j].iter().collect())
                        } else {
                            None
                        };
                        segments.push(Segment::Text(std::mem::take(&mut buf)));
                        segments.push(Segment::Hole {
                            name,
                            span: start..j,
                        });
                        holes += 1;
                        i = j;
                    }
                    _ => {
                        buf.push(c);
                        i += 1;
                    }
                },
            }
        }
        if !buf.is_empty() {
            segments.push(Segment::Text(buf));
        }

        Self {
            source: text.to_string(),
            segments,
            holes,
        }
    }

    /// The original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of placeholders (anonymous and named together).
    pub fn placeholder_count(&self) -> usize {
        self.holes
    }

    /// Placeholder names in template order; `None` for anonymous slots.
    pub fn placeholder_names(&self) -> Vec<Option<&str>> {
        self.segments
            .iter()
            .filter_map(|seg| match seg {
                Segment::Hole { name, .. } => Some(name.as_deref()),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Substitute `args` for the placeholders: each argument is converted
    /// to a term and its canonical text spliced into the placeholder span.
    pub fn render(&self, args: &[Value], policy: &ConversionPolicy) -> Result<String> {
        if args.len() != self.holes {
            return Err(PrologError::ArgumentCountMismatch {
                expected: self.holes,
                supplied: args.len(),
            });
        }
        let mut out = String::with_capacity(self.source.len());
        let mut next = 0;
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Hole { .. } => {
                    let term = policy.convert_object(&args[next])?;
                    next += 1;
                    out.push_str(&pretty::term_to_string(&term));
                }
            }
        }
        Ok(out)
    }
}

/// A prepared query: the template is scanned once, then `solve` re-runs
/// substitution, compilation, and execution with fresh arguments.
pub struct Query<'p> {
    prover: &'p Prover,
    template: GoalTemplate,
}

impl<'p> Query<'p> {
    pub(crate) fn new(prover: &'p Prover, template: GoalTemplate) -> Self {
        Self { prover, template }
    }

    /// The scanned template layout.
    pub fn template(&self) -> &GoalTemplate {
        &self.template
    }

    /// Execute with a fresh argument set.
    pub fn solve(&self, args: Vec<Value>) -> Result<Solution<'p>> {
        self.prover.solve_template(&self.template, args)
    }
}
