use crate::db::schema::t_credential;
use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = t_credential)]
pub struct CredentialRow {
    pub id: i32,
    pub password_hash: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = t_credential)]
pub struct NewCredentialRow<'a> {
    pub password_hash: &'a str,
}
