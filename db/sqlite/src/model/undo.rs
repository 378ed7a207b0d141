use sqlx::FromRow;

#[derive(FromRow)]
pub struct UndoModel {
    id: i64,
    pid: i64,
    tstamp: i64,
    #[sqlx(rename = "fromTable")]
    from_table: String,
    query: String,
    #[sqlx(rename = "affectedRows")]
    affected_rows: i64,
    data: String,
}

impl UndoModel {
    pub fn new(
        pid: &i64,
        tstamp: &i64,
        from_table: &str,
        query: &str,
        affected_rows: &i64,
        data: &str,
    ) -> Self {
        Self {
            id: 0,
            pid: *pid,
            tstamp: *tstamp,
            from_table: from_table.to_owned(),
            query: query.to_owned(),
            affected_rows: *affected_rows,
            data: data.to_owned(),
        }
    }

    pub fn id(&self) -> &i64 {
        &self.id
    }

    pub fn pid(&self) -> &i64 {
        &self.pid
    }

    pub fn tstamp(&self) -> &i64 {
        &self.tstamp
    }

    pub fn from_table(&self) -> &str {
        &self.from_table
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn affected_rows(&self) -> &i64 {
        &self.affected_rows
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}
