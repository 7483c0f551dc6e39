//! Renders a [`PastryQuery`] as PostgreSQL.
//!
//! Filtering happens inside the `ranked` CTE so a cursor that does not match
//! the filters yields an empty page, the same as the in-memory evaluation.
//! Continuation is a keyset comparison on `(sort key, id)`.
use crate::domain::pastry::{
    OrderBy, PastryCondition, PastryQuery, SliceDirective, SortDirection,
};
use sqlx::{Postgres, QueryBuilder};

pub(super) const BASE_SELECT: &str = "SELECT p.id, p.owner_id, p.name, p.description, p.price, \
     p.unit, p.created_at, p.updated_at, c.phone AS contact_phone, g.lat, g.lng, \
     (SELECT COUNT(*) FROM likes l WHERE l.pastry_id = p.id) AS like_count \
     FROM pastries p \
     JOIN pastry_contacts c ON c.pastry_id = p.id \
     LEFT JOIN pastry_geolocations g ON g.pastry_id = p.id";

const RANKED_COLUMNS: &str = "id, owner_id, name, description, price, unit, created_at, \
     updated_at, contact_phone, lat, lng, like_count";

pub(super) fn build_search(query: &PastryQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("WITH ranked AS (");
    qb.push(BASE_SELECT);
    qb.push(" WHERE ");
    push_condition(&mut qb, &query.condition);
    qb.push(") SELECT ");
    qb.push(RANKED_COLUMNS);
    qb.push(" FROM ranked");

    let key = sort_column(query.order.by);
    let direction = match query.order.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    push_keyset(&mut qb, &query.slice, key, query.order.direction);

    qb.push(format!(" ORDER BY {key} {direction}, id {direction} LIMIT "));
    qb.push_bind(i64::from(query.slice.take));
    qb
}

fn sort_column(by: OrderBy) -> &'static str {
    match by {
        OrderBy::Price => "price",
        OrderBy::CreatedAt => "created_at",
        OrderBy::Popularity => "like_count",
    }
}

fn push_keyset(
    qb: &mut QueryBuilder<'static, Postgres>,
    slice: &SliceDirective,
    key: &str,
    direction: SortDirection,
) {
    let Some(cursor) = slice.cursor else {
        return;
    };
    // `skip` is 1 whenever a cursor is present: the strict comparison below
    // excludes the cursor row itself.
    let comparison = match direction {
        SortDirection::Asc => ">",
        SortDirection::Desc => "<",
    };
    qb.push(format!(
        " WHERE ({key}, id) {comparison} (SELECT {key}, id FROM ranked WHERE id = "
    ));
    qb.push_bind(cursor.as_uuid());
    qb.push(")");
}

pub(super) fn push_condition(qb: &mut QueryBuilder<'static, Postgres>, condition: &PastryCondition) {
    match condition {
        PastryCondition::All(terms) => push_junction(qb, terms, " AND ", "TRUE"),
        PastryCondition::Any(terms) => push_junction(qb, terms, " OR ", "FALSE"),
        PastryCondition::NameContains(needle) => {
            qb.push("p.name ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(needle)));
        }
        PastryCondition::CategoryIn(categories) => {
            let tags: Vec<String> = categories.iter().map(|c| c.as_str().to_string()).collect();
            qb.push(
                "EXISTS (SELECT 1 FROM pastry_categories pc \
                 WHERE pc.pastry_id = p.id AND pc.category = ANY(",
            );
            qb.push_bind(tags);
            qb.push("))");
        }
        PastryCondition::PriceBetween { min, max } => {
            qb.push("(p.price >= ");
            qb.push_bind(min.value());
            if let Some(max) = max {
                qb.push(" AND p.price <= ");
                qb.push_bind(max.value());
            }
            qb.push(")");
        }
        PastryCondition::WithinBox(bbox) => {
            qb.push("(g.lat BETWEEN ");
            qb.push_bind(bbox.min_lat);
            qb.push(" AND ");
            qb.push_bind(bbox.max_lat);
            qb.push(" AND g.lng BETWEEN ");
            qb.push_bind(bbox.min_lng);
            qb.push(" AND ");
            qb.push_bind(bbox.max_lng);
            qb.push(")");
        }
        PastryCondition::NotId(id) => {
            qb.push("p.id <> ");
            qb.push_bind(id.as_uuid());
        }
    }
}

fn push_junction(
    qb: &mut QueryBuilder<'static, Postgres>,
    terms: &[PastryCondition],
    separator: &str,
    empty: &str,
) {
    if terms.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (index, term) in terms.iter().enumerate() {
        if index > 0 {
            qb.push(separator);
        }
        push_condition(qb, term);
    }
    qb.push(")");
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pastry::{
        Category, GeoFilter, GeoPoint, PageLimit, Pagination, PastryId, PastryOrder,
        PastrySearch, Price, PriceRange, RadiusKm, SearchFilters,
    };

    fn render(search: &PastrySearch) -> String {
        build_search(&PastryQuery::for_search(search)).sql().to_string()
    }

    #[test]
    fn match_all_renders_true_and_default_order() {
        let sql = render(&PastrySearch::default());
        assert!(sql.contains(" WHERE TRUE)"));
        assert!(sql.ends_with("ORDER BY like_count ASC, id ASC LIMIT $1"));
        assert!(!sql.contains("FROM ranked WHERE"));
    }

    #[test]
    fn filters_are_and_combined_in_order() {
        let search = PastrySearch {
            filters: SearchFilters {
                search: Some("Tart".into()),
                categories: [Category::Tart].into_iter().collect(),
                price: Some(PriceRange::new(Price::new(1.0).unwrap(), None).unwrap()),
                geolocation: Some(GeoFilter::new(
                    GeoPoint::new(42.0, 42.0).unwrap(),
                    RadiusKm::new(5.0).unwrap(),
                )),
            },
            ..PastrySearch::default()
        };
        let sql = render(&search);
        assert!(sql.contains(
            "WHERE (p.name ILIKE $1 AND EXISTS (SELECT 1 FROM pastry_categories pc \
             WHERE pc.pastry_id = p.id AND pc.category = ANY($2)) AND (p.price >= $3) \
             AND (g.lat BETWEEN $4 AND $5 AND g.lng BETWEEN $6 AND $7))"
        ));
    }

    #[test]
    fn cursor_becomes_strict_keyset_comparison() {
        let search = PastrySearch {
            order: PastryOrder::new(OrderBy::Price, SortDirection::Desc),
            pagination: Pagination::new(Some(PastryId::generate()), PageLimit::default()),
            ..PastrySearch::default()
        };
        let sql = render(&search);
        assert!(sql.contains(
            "FROM ranked WHERE (price, id) < (SELECT price, id FROM ranked WHERE id = $1)"
        ));
        assert!(sql.ends_with("ORDER BY price DESC, id DESC LIMIT $2"));
    }

    #[test]
    fn empty_disjunction_matches_nothing() {
        let mut qb = QueryBuilder::new("");
        push_condition(&mut qb, &PastryCondition::Any(Vec::new()));
        assert_eq!(qb.sql(), "FALSE");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
    }
}
