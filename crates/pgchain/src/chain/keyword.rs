//! SQL keywords a chain fragment can be tagged with.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Select,
    From,
    Join,
    LeftJoin,
    RightJoin,
    FullJoin,
    Where,
    And,
    Or,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    InsertInto,
    Values,
    OnConflict,
    Set,
    Update,
    DeleteFrom,
    Returning,
    As,
    Union,
    Exists,
    WithRecursive,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Join => "JOIN",
            Keyword::LeftJoin => "LEFT JOIN",
            Keyword::RightJoin => "RIGHT JOIN",
            Keyword::FullJoin => "FULL JOIN",
            Keyword::Where => "WHERE",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::GroupBy => "GROUP BY",
            Keyword::Having => "HAVING",
            Keyword::OrderBy => "ORDER BY",
            Keyword::Limit => "LIMIT",
            Keyword::Offset => "OFFSET",
            Keyword::InsertInto => "INSERT INTO",
            Keyword::Values => "VALUES",
            Keyword::OnConflict => "ON CONFLICT",
            Keyword::Set => "SET",
            Keyword::Update => "UPDATE",
            Keyword::DeleteFrom => "DELETE FROM",
            Keyword::Returning => "RETURNING",
            Keyword::As => "AS",
            Keyword::Union => "UNION",
            Keyword::Exists => "EXISTS",
            Keyword::WithRecursive => "WITH RECURSIVE",
        }
    }

    /// Predicate keywords wrap their template in parentheses so that several
    /// predicates combine safely regardless of their internal operators.
    pub fn wraps_parens(self) -> bool {
        matches!(self, Keyword::Where | Keyword::And | Keyword::Having)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
