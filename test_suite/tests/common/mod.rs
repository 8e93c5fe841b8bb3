use chrono::NaiveDate;
use filtercrate::{
    FieldCriteria, FieldType, FilterConfig, FilterSchema, LogicalOperator, Operation,
    PaginationMode, QSearch, Selectable, SortBy,
};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

pub mod user_entity;

use user_entity::{ActiveModel, Column, Entity as User};

pub const GENDERS: [&str; 2] = ["MAN", "WOMAN"];

fn user(
    first_name: &str,
    last_name: &str,
    age: i32,
    is_working: bool,
    birthday: (i32, u32, u32),
    gender: &str,
    created_at: (i32, u32, u32),
) -> ActiveModel {
    let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    ActiveModel {
        id: NotSet,
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        age: Set(age),
        is_working: Set(is_working),
        birthday: Set(date(birthday)),
        gender: Set(gender.to_string()),
        created_at: Set(date(created_at).and_hms_opt(0, 0, 0).unwrap()),
    }
}

/// In-memory SQLite with the `users` table and two rows, Alice and Bob.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(User)))
        .await?;

    User::insert_many([
        user("Alice", "Smith", 30, true, (1993, 4, 20), "WOMAN", (2023, 1, 1)),
        user("Bob", "Jones", 40, false, (1983, 4, 20), "MAN", (2022, 5, 1)),
    ])
    .exec(&db)
    .await?;

    Ok(db)
}

/// Users schema: public name criteria, private age/birthday criteria,
/// gender enumeration, name search, sorting and selection over every column.
#[allow(dead_code)]
pub fn user_schema(pagination: PaginationMode) -> FilterSchema {
    FilterConfig::new()
        .field(
            FieldCriteria::new("first_name")
                .column(Column::FirstName)
                .ops([Operation::Eq, Operation::Neq, Operation::Like, Operation::Ilike, Operation::In])
                .with_prefix("user_public"),
        )
        .field(
            FieldCriteria::new("name")
                .column_group([Column::FirstName, Column::LastName], LogicalOperator::Or)
                .ops([Operation::Eq, Operation::Ilike])
                .with_prefix("user_public"),
        )
        .field(
            FieldCriteria::new("age")
                .column(Column::Age)
                .ops([Operation::Eq, Operation::Gt, Operation::Lt, Operation::Btw, Operation::In, Operation::Notin])
                .with_prefix("user_private"),
        )
        .field(
            FieldCriteria::new("birthday")
                .column(Column::Birthday)
                .ops([Operation::Gte, Operation::Btw])
                .with_prefix("user_private"),
        )
        .field(
            FieldCriteria::new("is_working")
                .column(Column::IsWorking)
                .ops([Operation::Eq, Operation::Is]),
        )
        .field(
            FieldCriteria::new("gender")
                .of_type(FieldType::Enum(GENDERS.iter().map(ToString::to_string).collect()))
                .column(Column::Gender)
                .ops([Operation::Eq, Operation::In]),
        )
        .field(
            FieldCriteria::new("created_at")
                .column(Column::CreatedAt)
                .ops([Operation::Gt, Operation::Lt]),
        )
        .q_search(QSearch::new([Column::FirstName, Column::LastName], Operation::Ilike))
        .sort_by(SortBy::new([
            ("first_name", Column::FirstName),
            ("age", Column::Age),
            ("created_at", Column::CreatedAt),
        ]))
        .select_only(Selectable::new([
            ("first_name", Column::FirstName),
            ("last_name", Column::LastName),
            ("age", Column::Age),
        ]))
        .pagination(pagination)
        .build()
        .expect("users schema is valid")
}

/// First names of the rows matching a query string, in result order.
#[allow(dead_code)]
pub async fn first_names(
    db: &DatabaseConnection,
    schema: &FilterSchema,
    query: &str,
) -> Vec<String> {
    let result = schema
        .parse_query(query)
        .expect("query is valid")
        .filter_result()
        .expect("schema compiles");
    result
        .apply(User::find())
        .all(db)
        .await
        .expect("query runs")
        .into_iter()
        .map(|user| user.first_name)
        .collect()
}
