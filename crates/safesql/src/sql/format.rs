//! Template expansion: `b.format("{} = {}", &[..])`.
//!
//! `{}` consumes the next argument and `{{` / `}}` write a literal brace.
//! Each argument decides how it reaches the builder, so a template can mix
//! bound values, escaped names and whole sub-fragments without ever
//! concatenating caller data into the text.

use crate::error::{SqlError, SqlResult};
use crate::param::Param;
use crate::trace;
use tokio_postgres::types::ToSql;

use super::{SafeSql, SafeSqlBuilder, SqlNode};

/// One argument of [`SafeSqlBuilder::format`].
pub enum FormatArg<'a> {
    /// Bound as a parameter.
    Param(Param),
    /// Escaped and written as an identifier.
    Identifier(&'a str),
    /// Escaped and written as a string literal.
    Literal(&'a str),
    /// Spliced as a finalized fragment.
    Sql(&'a SafeSql),
    /// Rendered in place.
    Node(&'a dyn SqlNode),
}

impl<'a> FormatArg<'a> {
    /// Bind `value` as a parameter.
    pub fn value<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        FormatArg::Param(Param::new(value))
    }

    /// Write `name` as an escaped identifier.
    pub fn ident(name: &'a str) -> Self {
        FormatArg::Identifier(name)
    }

    /// Write `value` as an escaped string literal.
    pub fn literal(value: &'a str) -> Self {
        FormatArg::Literal(value)
    }

    /// Render `node` in place.
    pub fn node(node: &'a dyn SqlNode) -> Self {
        FormatArg::Node(node)
    }

    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        match self {
            FormatArg::Param(param) => {
                builder.bind_param(param.clone());
            }
            FormatArg::Identifier(name) => {
                builder.identifier(name);
            }
            FormatArg::Literal(value) => {
                builder.literal_string(value);
            }
            FormatArg::Sql(sql) => {
                builder.append_sql(sql);
            }
            FormatArg::Node(node) => {
                builder.append_node(*node);
            }
        }
    }
}

impl<'a> From<&'a SafeSql> for FormatArg<'a> {
    fn from(sql: &'a SafeSql) -> Self {
        FormatArg::Sql(sql)
    }
}

impl From<Param> for FormatArg<'_> {
    fn from(param: Param) -> Self {
        FormatArg::Param(param)
    }
}

impl SafeSqlBuilder {
    /// Expand `template`, dispatching each `{}` to the next argument.
    ///
    /// On error nothing is written: the builder is rolled back to its state
    /// before the call.
    pub fn format(&mut self, template: &str, args: &[FormatArg<'_>]) -> SqlResult<&mut Self> {
        let before = self.checkpoint();
        match expand(self, template, args) {
            Ok(()) => Ok(self),
            Err(err) => {
                trace::format_rejected(template, &err);
                self.rollback(before);
                Err(err)
            }
        }
    }
}

fn expand(builder: &mut SafeSqlBuilder, template: &str, args: &[FormatArg<'_>]) -> SqlResult<()> {
    let mut args = args.iter();
    let mut used = 0usize;
    let mut literal_start = 0usize;
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                builder.append_text(&template[literal_start..pos]);
                match chars.next() {
                    Some((_, '{')) => {
                        builder.append_char('{');
                    }
                    Some((_, '}')) => {
                        let Some(arg) = args.next() else {
                            return Err(SqlError::format(format!(
                                "template needs more than {used} argument(s)"
                            )));
                        };
                        arg.append_to(builder);
                        used += 1;
                    }
                    _ => {
                        return Err(SqlError::format(format!(
                            "unmatched '{{' at byte {pos}"
                        )));
                    }
                }
                literal_start = chars.peek().map_or(template.len(), |&(next, _)| next);
            }
            '}' => {
                builder.append_text(&template[literal_start..pos]);
                if !matches!(chars.next(), Some((_, '}'))) {
                    return Err(SqlError::format(format!("unmatched '}}' at byte {pos}")));
                }
                builder.append_char('}');
                literal_start = chars.peek().map_or(template.len(), |&(next, _)| next);
            }
            _ => {}
        }
    }
    builder.append_text(&template[literal_start..]);

    let extra = args.count();
    if extra > 0 {
        return Err(SqlError::format(format!(
            "template used {used} argument(s) but {} were given",
            used + extra
        )));
    }
    Ok(())
}
