use chrono::NaiveDate;
use thiserror::Error;

use crate::month;

/// How a field's raw filter text is coerced before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Month,
    Text,
}

/// A filter value after coercion. The store binds these as SQL parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Month(NaiveDate),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryError::MalformedOrder(raw.to_string())),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// The single directive derived from a list request's parameters.
///
/// Field names carried here are always the `&'static str` entries of the
/// owning [`FieldTable`], never caller input.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySpec {
    Unfiltered,
    Sort {
        field: &'static str,
        order: SortOrder,
    },
    Filter {
        field: &'static str,
        value: FieldValue,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("malformed value `{value}` for field `{field}`")]
    MalformedValue { field: &'static str, value: String },
    #[error("`field` parameter is required alongside `sort` or `filter`")]
    MissingField,
    #[error("unrecognized sort order `{0}`")]
    MalformedOrder(String),
}

/// Closed set of filterable/sortable fields for one payment kind.
pub struct FieldTable {
    fields: &'static [(&'static str, FieldKind)],
}

pub static CARD_PAYMENT_FIELDS: FieldTable = FieldTable {
    fields: &[
        ("id", FieldKind::Integer),
        ("card_number", FieldKind::Text),
        ("amount", FieldKind::Integer),
        ("card_ttl", FieldKind::Month),
        ("cvc", FieldKind::Text),
        ("comment", FieldKind::Text),
        ("email", FieldKind::Text),
        ("is_safe", FieldKind::Text),
    ],
};

pub static REQUESTED_PAYMENT_FIELDS: FieldTable = FieldTable {
    fields: &[
        ("id", FieldKind::Integer),
        ("tax", FieldKind::Text),
        ("bic", FieldKind::Text),
        ("account_number", FieldKind::Text),
        ("phone", FieldKind::Text),
        ("amount", FieldKind::Integer),
        ("comment", FieldKind::Text),
        ("email", FieldKind::Text),
    ],
};

impl FieldTable {
    pub fn lookup(&self, name: &str) -> Result<(&'static str, FieldKind), QueryError> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .copied()
            .ok_or_else(|| QueryError::UnknownField(name.to_string()))
    }

    /// Coerce a raw filter string according to the field's kind. Text fields
    /// pass through unmodified — an empty string is a value, not "unset".
    pub fn coerce(&self, name: &str, raw: &str) -> Result<(&'static str, FieldValue), QueryError> {
        let (field, kind) = self.lookup(name)?;
        let value = match kind {
            FieldKind::Integer => raw
                .trim()
                .parse()
                .map(FieldValue::Int)
                .map_err(|_| malformed(field, raw))?,
            FieldKind::Month => month::parse_month(raw)
                .map(FieldValue::Month)
                .ok_or_else(|| malformed(field, raw))?,
            FieldKind::Text => FieldValue::Text(raw.to_string()),
        };
        Ok((field, value))
    }
}

fn malformed(field: &'static str, value: &str) -> QueryError {
    QueryError::MalformedValue {
        field,
        value: value.to_string(),
    }
}

impl QuerySpec {
    /// Derive the directive from the `sort`, `filter` and `field` request
    /// parameters. Sorting always wins: when `sort` is present, `filter` is
    /// ignored even if also supplied. Empty parameters count as absent.
    pub fn from_params(
        sort: Option<&str>,
        filter: Option<&str>,
        field: Option<&str>,
        table: &FieldTable,
    ) -> Result<QuerySpec, QueryError> {
        let sort = sort.filter(|s| !s.is_empty());
        let filter = filter.filter(|s| !s.is_empty());
        let field = field.filter(|s| !s.is_empty());

        if let Some(order) = sort {
            let name = field.ok_or(QueryError::MissingField)?;
            let (field, _) = table.lookup(name)?;
            Ok(QuerySpec::Sort {
                field,
                order: SortOrder::parse(order)?,
            })
        } else if let Some(raw) = filter {
            let name = field.ok_or(QueryError::MissingField)?;
            let (field, value) = table.coerce(name, raw)?;
            Ok(QuerySpec::Filter { field, value })
        } else {
            Ok(QuerySpec::Unfiltered)
        }
    }
}
