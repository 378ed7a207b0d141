use sqlx::FromRow;

#[derive(FromRow)]
pub struct VersionModel {
    id: i64,
    pid: i64,
    tstamp: i64,
    version: i64,
    #[sqlx(rename = "fromTable")]
    from_table: String,
    username: String,
    active: bool,
    data: String,
}

impl VersionModel {
    pub fn id(&self) -> &i64 {
        &self.id
    }

    pub fn pid(&self) -> &i64 {
        &self.pid
    }

    pub fn tstamp(&self) -> &i64 {
        &self.tstamp
    }

    pub fn version(&self) -> &i64 {
        &self.version
    }

    pub fn from_table(&self) -> &str {
        &self.from_table
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn active(&self) -> &bool {
        &self.active
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}
