use super::select::page_bounds;
use super::traits::first_or_not_found;
use super::*;
use crate::chain::{self, exists};
use crate::client::GenericClient;
use crate::error::{ChainError, ChainResult};
use crate::sql;
use std::sync::Mutex;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

// ── Shared RecordingClient for execution tests ──

/// Captures every `(sql, params)` pair it receives and returns no rows.
#[derive(Default)]
struct RecordingClient {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    affected: u64,
}

impl RecordingClient {
    fn record(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) {
        let params = params.iter().map(|p| format!("{p:?}")).collect();
        self.calls.lock().unwrap().push((sql.to_string(), params));
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl GenericClient for RecordingClient {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ChainResult<Vec<Row>> {
        self.record(sql, params);
        Ok(vec![])
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ChainResult<u64> {
        self.record(sql, params);
        Ok(self.affected)
    }
}

#[test]
fn select_where_and() {
    let r = select("id, name")
        .from("users")
        .where_(sql!("id = " {1_i64}))
        .and(sql!("status = " {"active"}))
        .render();
    assert_eq!(
        r.sql,
        "SELECT id, name FROM \"users\" WHERE (id = $1) AND (status = $2)"
    );
    assert_eq!(r.params_debug(), vec!["1", "\"active\""]);
}

#[test]
fn select_without_columns_is_star() {
    let q = SelectQueryBuilder::new().from("posts");
    assert_eq!(q.to_sql(), "SELECT * FROM \"posts\"");
}

#[test]
fn repeated_select_calls_merge() {
    let split = select("a").select("b").select("c").from("t");
    let single = select("a, b, c").from("t");
    assert_eq!(split.to_sql(), single.to_sql());
    assert_eq!(split.to_sql(), "SELECT a, b, c FROM \"t\"");
}

#[test]
fn select_columns_with_values_keep_order() {
    let r = select(sql!("coalesce(score, " {0_i32} ") AS score"))
        .select(sql!("rank() OVER (ORDER BY " {"x"} ")"))
        .from("t")
        .where_(sql!("id = " {9_i64}))
        .render();
    assert_eq!(
        r.sql,
        "SELECT coalesce(score, $1) AS score, rank() OVER (ORDER BY $2) FROM \"t\" WHERE (id = $3)"
    );
    assert_eq!(r.params_debug(), vec!["0", "\"x\"", "9"]);
}

#[test]
fn join_keeps_declaration_order() {
    let r = select("id, title, users.name as \"author\"")
        .from("posts")
        .join("users ON users.id = posts.author_id")
        .left_join("tags ON tags.post_id = posts.id")
        .where_(sql!("posts.status = " {"published"}))
        .render();
    assert_eq!(
        r.sql,
        "SELECT id, title, users.name as \"author\" FROM \"posts\" \
         JOIN users ON users.id = posts.author_id \
         LEFT JOIN tags ON tags.post_id = posts.id \
         WHERE (posts.status = $1)"
    );
}

#[test]
fn full_clause_order() {
    let r = select("author_id, count(*)")
        .from("posts")
        .where_(sql!("status = " {"published"}))
        .group_by("author_id")
        .having(sql!("count(*) > " {3_i64}))
        .order_by("author_id")
        .limit(10)
        .offset(20)
        .render();
    assert_eq!(
        r.sql,
        "SELECT author_id, count(*) FROM \"posts\" WHERE (status = $1) \
         GROUP BY author_id HAVING (count(*) > $2) ORDER BY author_id LIMIT $3 OFFSET $4"
    );
    assert_eq!(r.params_debug(), vec!["\"published\"", "3", "10", "20"]);
}

#[test]
fn where_mapping_expands_per_key() {
    let r = select("*")
        .from("posts")
        .where_(
            Values::new()
                .set("authorId", 5_i64)
                .set("status", "draft")
                .set_opt("categoryId", None::<i64>),
        )
        .render();
    assert_eq!(
        r.sql,
        "SELECT * FROM \"posts\" WHERE (\"author_id\" = $1) AND (\"status\" = $2)"
    );
}

#[test]
fn where_exists_continues_outer_numbering() {
    let sub = chain::select("1")
        .from("comments c")
        .where_(sql!("c.post_id = p.id AND c.author_id = " {7_i64}));
    let r = select("p.id")
        .from("posts p")
        .where_(sql!("p.status = " {"published"}))
        .and(exists(sub))
        .render();
    assert_eq!(
        r.sql,
        "SELECT p.id FROM posts p WHERE (p.status = $1) \
         AND (EXISTS (SELECT 1 FROM comments c WHERE (c.post_id = p.id AND c.author_id = $2)))"
    );
    assert_eq!(r.params_debug(), vec!["\"published\"", "7"]);
}

#[test]
fn order_by_sub_select_is_parenthesized() {
    let latest = select("max(c.created_at)")
        .from("comments c")
        .where_(sql!("c.post_id = p.id AND c.kind = " {"reply"}));
    let r = select("p.id")
        .from("posts p")
        .where_(sql!("p.author_id = " {1_i64}))
        .order_by(&latest)
        .limit(5)
        .render();
    assert_eq!(
        r.sql,
        "SELECT p.id FROM posts p WHERE (p.author_id = $1) \
         ORDER BY (SELECT max(c.created_at) FROM comments c WHERE (c.post_id = p.id AND c.kind = $2)) \
         LIMIT $3"
    );
}

#[test]
fn builder_binds_as_nested_chain() {
    let banned = select("user_id").from("bans").where_(sql!("reason = " {"spam"}));
    let r = select("*")
        .from("users")
        .where_(sql!("active = " {true} " AND id NOT IN (" {banned} ")"))
        .render();
    assert_eq!(
        r.sql,
        "SELECT * FROM \"users\" WHERE (active = $1 AND id NOT IN (SELECT user_id FROM \"bans\" WHERE (reason = $2)))"
    );
}

#[test]
fn from_template_with_slots_is_not_quoted() {
    let inner = select("id").from("events").where_(sql!("kind = " {"click"}));
    let r = select("count(*)")
        .from(sql!("(" {inner} ") AS e"))
        .render();
    assert_eq!(
        r.sql,
        "SELECT count(*) FROM (SELECT id FROM \"events\" WHERE (kind = $1)) AS e"
    );
}

#[test]
fn qualified_and_quoted_tables_are_untouched() {
    assert_eq!(select("*").from("public.users").to_sql(), "SELECT * FROM public.users");
    assert_eq!(
        select("*").from("\"public\".\"users\"").to_sql(),
        "SELECT * FROM \"public\".\"users\""
    );
    assert_eq!(select("*").from("users u").to_sql(), "SELECT * FROM users u");
}

#[test]
fn count_drops_paging_and_order() {
    let q = select("id, title")
        .from("posts")
        .where_(sql!("status = " {"published"}))
        .order_by("created_at DESC")
        .limit(10)
        .offset(30);
    let r = q.render_count();
    assert_eq!(
        r.sql,
        "SELECT COUNT(*)::int AS \"count\" FROM \"posts\" WHERE (status = $1)"
    );
    assert_eq!(r.params.len(), 1);
}

#[test]
fn count_of_grouped_query_wraps_subquery() {
    let q = select("author_id")
        .from("posts")
        .where_(sql!("status = " {"published"}))
        .group_by("author_id")
        .having(sql!("count(*) > " {1_i64}));
    assert_eq!(
        q.render_count().sql,
        "SELECT COUNT(*)::int AS \"count\" FROM (SELECT 1 FROM \"posts\" WHERE (status = $1) \
         GROUP BY author_id HAVING (count(*) > $2)) AS t"
    );
}

#[test]
fn limit_and_offset_can_be_cleared() {
    let q = select("*").from("t").limit(5).offset(10);
    assert_eq!(q.clear_limit().clear_offset().to_sql(), "SELECT * FROM \"t\"");
    assert_eq!(q.to_sql(), "SELECT * FROM \"t\" LIMIT $1 OFFSET $2");
}

#[test]
fn page_bounds_are_zero_based() {
    assert_eq!(page_bounds(0, 20), (20, 0));
    assert_eq!(page_bounds(3, 20), (20, 60));
}

#[test]
fn find_reports_not_found() {
    let err = first_or_not_found(Vec::<i32>::new(), "no such post").unwrap_err();
    assert!(matches!(err, ChainError::NotFound(ref m) if m == "no such post"));
    assert_eq!(first_or_not_found(vec![4, 5], "unused").unwrap(), 4);
}

#[tokio::test]
async fn find_without_rows_uses_default_message() {
    let client = RecordingClient::default();
    let err = select("id")
        .from("posts")
        .limit(50)
        .find::<Row>(&client, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::NotFound(ref m) if m == "method find returned no results"));

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "SELECT id FROM \"posts\" LIMIT $1");
    assert_eq!(calls[0].1, vec!["1"]);
}

#[tokio::test]
async fn find_without_rows_uses_caller_message() {
    let client = RecordingClient::default();
    let err = select("id")
        .from("posts")
        .where_(sql!("id = " {9_i64}))
        .find::<Row>(&client, Some("post 9 does not exist"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::NotFound(ref m) if m == "post 9 does not exist"));
    assert_eq!(
        client.calls()[0],
        (
            "SELECT id FROM \"posts\" WHERE (id = $1) LIMIT $2".to_string(),
            vec!["9".to_string(), "1".to_string()]
        )
    );
}

#[tokio::test]
async fn first_adds_limit_one() {
    let client = RecordingClient::default();
    let row: Option<Row> = select("*")
        .from("posts")
        .order_by("id")
        .first(&client)
        .await
        .unwrap();
    assert!(row.is_none());
    assert_eq!(
        client.calls()[0].0,
        "SELECT * FROM \"posts\" ORDER BY id LIMIT $1"
    );
    assert_eq!(client.calls()[0].1, vec!["1"]);
}

#[tokio::test]
async fn page_lists_then_counts() {
    let client = RecordingClient::default();
    let q = select("id")
        .from("posts")
        .where_(sql!("status = " {"published"}))
        .order_by("id");

    // No row comes back for the count, so the page fails after both statements ran.
    let err = q.page::<Row>(&client, 2, 10).await.unwrap_err();
    assert!(err.is_not_found());

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].0,
        "SELECT id FROM \"posts\" WHERE (status = $1) ORDER BY id LIMIT $2 OFFSET $3"
    );
    assert_eq!(calls[0].1, vec!["\"published\"", "10", "20"]);
    assert_eq!(
        calls[1].0,
        "SELECT COUNT(*)::int AS \"count\" FROM \"posts\" WHERE (status = $1)"
    );
    assert_eq!(calls[1].1, vec!["\"published\""]);
}

#[tokio::test]
async fn statements_reach_the_client_as_rendered() {
    let client = RecordingClient {
        affected: 3,
        ..Default::default()
    };
    let q = update("posts")
        .set(Values::new().set("title", "New"))
        .where_(sql!("author_id = " {4_i64}));

    assert_eq!(q.execute(&client).await.unwrap(), 3);
    let rows: Vec<Row> = q.fetch_all(&client).await.unwrap();
    assert!(rows.is_empty());

    let expected = q.render();
    for (sql, params) in client.calls() {
        assert_eq!(sql, expected.sql);
        assert_eq!(params, expected.params_debug());
    }
    assert_eq!(client.calls().len(), 2);
}

#[test]
fn builders_are_copy_on_write() {
    let base = select("id").from("posts");
    let drafts = base.where_(sql!("status = " {"draft"}));
    let published = base.where_(sql!("status = " {"published"})).limit(3);

    assert_eq!(base.to_sql(), "SELECT id FROM \"posts\"");
    assert_eq!(drafts.to_sql(), "SELECT id FROM \"posts\" WHERE (status = $1)");
    assert_eq!(
        published.to_sql(),
        "SELECT id FROM \"posts\" WHERE (status = $1) LIMIT $2"
    );
}

#[test]
fn when_composes_optional_clauses() {
    let status: Option<&'static str> = Some("draft");
    let author: Option<i64> = None;
    let q = select("*")
        .from("posts")
        .when(status.is_some(), |q| q.where_(sql!("status = " {status})))
        .when(author.is_some(), |q| q.where_(sql!("author_id = " {author})));
    assert_eq!(q.to_sql(), "SELECT * FROM \"posts\" WHERE (status = $1)");
}

#[test]
fn rendering_twice_is_identical() {
    let q = select("id")
        .from("posts")
        .where_(Values::new().set("status", "published"))
        .limit(1);
    let (a, b) = (q.render(), q.render());
    assert_eq!(a.sql, b.sql);
    assert_eq!(a.params_debug(), b.params_debug());
}

// ==================== INSERT ====================

#[test]
fn insert_values() {
    let r = insert_into("users")
        .values(Values::new().set("id", 1_i64).set("name", "John Doe"))
        .render();
    assert_eq!(r.sql, "INSERT INTO \"users\" (\"id\", \"name\") VALUES ($1, $2)");
    assert_eq!(r.params_debug(), vec!["1", "\"John Doe\""]);
}

#[test]
fn insert_returning() {
    let r = insert_into("posts")
        .values(Values::new().set("title", "Hello").unset("body"))
        .returning("id")
        .render();
    assert_eq!(
        r.sql,
        "INSERT INTO \"posts\" (\"title\") VALUES ($1) RETURNING id"
    );
}

#[test]
fn insert_empty_mapping_uses_defaults() {
    let r = insert_into("audit_log").returning("id").render();
    assert_eq!(r.sql, "INSERT INTO \"audit_log\" DEFAULT VALUES RETURNING id");
    assert!(r.params.is_empty());
}

#[test]
fn insert_on_conflict_forms() {
    let row = Values::new().set("email", "a@b.c").set("name", "A");

    let raw = insert_into("users")
        .values(row.clone())
        .on_conflict("(email) DO NOTHING");
    assert_eq!(
        raw.to_sql(),
        "INSERT INTO \"users\" (\"email\", \"name\") VALUES ($1, $2) ON CONFLICT (email) DO NOTHING"
    );

    let nothing = insert_into("users").values(row.clone()).on_conflict_do_nothing(None);
    assert_eq!(
        nothing.to_sql(),
        "INSERT INTO \"users\" (\"email\", \"name\") VALUES ($1, $2) ON CONFLICT DO NOTHING"
    );

    let targeted = insert_into("users")
        .values(row.clone())
        .on_conflict_do_nothing(Some("email".into()));
    assert_eq!(
        targeted.to_sql(),
        "INSERT INTO \"users\" (\"email\", \"name\") VALUES ($1, $2) ON CONFLICT (email) DO NOTHING"
    );

    let upsert = insert_into("users")
        .values(row)
        .on_conflict_do_update("email")
        .set(Values::new().set("name", "B"))
        .returning("id");
    let r = upsert.render();
    assert_eq!(
        r.sql,
        "INSERT INTO \"users\" (\"email\", \"name\") VALUES ($1, $2) \
         ON CONFLICT (email) DO UPDATE SET \"name\" = $3 RETURNING id"
    );
    assert_eq!(r.params_debug(), vec!["\"a@b.c\"", "\"A\"", "\"B\""]);
}

#[test]
fn insert_set_needs_an_updating_conflict_clause() {
    let row = Values::new().set("email", "a@b.c");
    let patch = Values::new().set("name", "B");

    let nothing = insert_into("users")
        .values(row.clone())
        .on_conflict_do_nothing(None)
        .set(patch.clone())
        .render();
    assert_eq!(
        nothing.sql,
        "INSERT INTO \"users\" (\"email\") VALUES ($1) ON CONFLICT DO NOTHING"
    );
    assert_eq!(nothing.params.len(), 1);

    let plain = insert_into("users").values(row.clone()).set(patch.clone());
    assert_eq!(plain.to_sql(), "INSERT INTO \"users\" (\"email\") VALUES ($1)");

    let raw = insert_into("users")
        .values(row)
        .on_conflict("(email) DO UPDATE")
        .set(patch);
    assert_eq!(
        raw.to_sql(),
        "INSERT INTO \"users\" (\"email\") VALUES ($1) ON CONFLICT (email) DO UPDATE SET \"name\" = $2"
    );
}

// ==================== UPDATE ====================

#[test]
fn update_set_where_returning() {
    let r = update("posts")
        .set(Values::new().set("title", "New"))
        .where_(sql!("id = " {1_i64}))
        .returning("id")
        .render();
    assert_eq!(
        r.sql,
        "UPDATE \"posts\" SET \"title\" = $1 WHERE (id = $2) RETURNING id"
    );
}

#[test]
fn update_set_templates_merge() {
    let r = update("users")
        .set(sql!("status = " {"banned"}))
        .set(sql!("update_date = " {1_700_000_000_i64}))
        .where_(sql!("id = " {3_i64}))
        .render();
    assert_eq!(
        r.sql,
        "UPDATE \"users\" SET status = $1, update_date = $2 WHERE (id = $3)"
    );
}

#[test]
fn update_drops_unset_keys() {
    let r = update("posts")
        .set(Values::new().set("title", "X").unset("status"))
        .render();
    assert_eq!(r.sql, "UPDATE \"posts\" SET \"title\" = $1");
}

// ==================== DELETE ====================

#[test]
fn delete_where() {
    let r = delete_from("users").where_(sql!("id = " {1_i64})).render();
    assert_eq!(r.sql, "DELETE FROM \"users\" WHERE (id = $1)");
}

#[test]
fn delete_where_mapping_returning() {
    let r = delete_from("sessions")
        .where_(Values::new().set("userId", 2_i64))
        .and(sql!("expires_at < now()"))
        .returning("id")
        .render();
    assert_eq!(
        r.sql,
        "DELETE FROM \"sessions\" WHERE (\"user_id\" = $1) AND (expires_at < now()) RETURNING id"
    );
}
