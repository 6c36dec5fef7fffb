//! Bind FieldValue as a PostgreSQL text parameter. Statements cast each placeholder to the column's declared type.

use crate::value::FieldValue;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

impl<'q> Encode<'q, Postgres> for FieldValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self.to_sql_text() {
            None => <Option<&str> as Encode<Postgres>>::encode_by_ref(&None, buf),
            Some(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
        }
    }
}

impl sqlx::Type<Postgres> for FieldValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
