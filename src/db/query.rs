//! SQL fragments shared by the PostgreSQL repositories.
//!
//! Column names pushed here always come from compile-time whitelists; client
//! input only ever reaches the statement through bind parameters.

use sqlx::{Postgres, QueryBuilder};

use crate::listing::{ListQuery, ID_COLUMN};
use crate::patch::{FieldValue, UpdateSet};

/// `%needle%` with LIKE metacharacters escaped, so search is a literal substring
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// ` AND (col1 ILIKE $n OR col2 ILIKE $m ...)` when a search is present
pub fn push_search(qb: &mut QueryBuilder<'_, Postgres>, columns: &[&str], search: Option<&str>) {
    let Some(search) = search else {
        return;
    };
    let pattern = like_pattern(search);

    qb.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*column)
            .push(" ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\'");
    }
    qb.push(")");
}

/// ` ORDER BY <col> <dir>, id ASC LIMIT $n OFFSET $m`
pub fn push_order_and_page(qb: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) {
    qb.push(" ORDER BY ")
        .push(query.sort_by)
        .push(" ")
        .push(query.order.as_sql());
    if query.sort_by != ID_COLUMN {
        qb.push(", id ASC");
    }
    qb.push(" LIMIT ")
        .push_bind(query.limit as i64)
        .push(" OFFSET ")
        .push_bind(query.offset());
}

/// `col1 = $n, col2 = $m ...`
pub fn push_assignments(qb: &mut QueryBuilder<'_, Postgres>, set: &UpdateSet) {
    for (i, (column, value)) in set.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(*column).push(" = ");
        push_field(qb, value);
    }
}

fn push_field(qb: &mut QueryBuilder<'_, Postgres>, value: &FieldValue) {
    match value {
        FieldValue::Text(v) => qb.push_bind(v.clone()),
        FieldValue::Int(v) => qb.push_bind(*v),
        FieldValue::Date(v) => qb.push_bind(*v),
        FieldValue::Timestamp(v) => qb.push_bind(*v),
        FieldValue::Bool(v) => qb.push_bind(*v),
    };
}
