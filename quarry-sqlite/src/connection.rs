use crate::{
    CBox, SqliteDriver, SqlitePrepared, SqliteTransaction, error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use async_stream::try_stream;
use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_changes, sqlite3_close, sqlite3_column_count,
    sqlite3_errmsg, sqlite3_finalize, sqlite3_last_insert_rowid, sqlite3_open_v2,
    sqlite3_prepare_v2, sqlite3_step, sqlite3_stmt, sqlite3_total_changes,
};
use quarry_core::{
    Connection, Context, Driver, Error, Executor, Query, QueryResult, Result, Row, RowLabeled,
    RowNames, RowsAffected,
    future::Either,
    stream::{Stream, StreamExt},
    truncate_long,
};
use std::{
    ffi::{CString, c_char, c_int},
    pin::pin,
    ptr,
    sync::Arc,
};
use tokio::task::{spawn_blocking, yield_now};

pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
}

impl SqliteConnection {
    /// Non owning copy of the handle, for work that outlives the borrow of `self`.
    fn handle(&self) -> CBox<*mut sqlite3> {
        CBox::new(*self.connection, |_| {})
    }

    /// Run every statement of `sql`, one after the other.
    fn run_unprepared(&mut self, sql: String) -> impl Stream<Item = Result<QueryResult>> + Send {
        let connection = self.handle();
        try_stream! {
            let sql: Arc<str> = sql.into();
            let mut offset = 0;
            while offset < sql.len() {
                let (statement, consumed) = {
                    let connection = CBox::new(*connection, |_| {});
                    let sql = sql.clone();
                    spawn_blocking(move || prepare_one(*connection, &sql[offset..])).await??
                };
                if consumed == 0 {
                    break;
                }
                offset += consumed;
                if statement.is_null() {
                    // Whitespace or comment only
                    continue;
                }
                let mut stream = pin!(run_statement(CBox::new(*connection, |_| {}), statement));
                while let Some(value) = stream.next().await {
                    yield value?;
                }
            }
        }
    }
}

/// Compile the first statement of `sql`, returns it with the number of bytes consumed.
///
/// The statement is null when `sql` holds no statement.
fn prepare_one(connection: *mut sqlite3, sql: &str) -> Result<(CBox<*mut sqlite3_stmt>, usize)> {
    unsafe {
        let mut statement = CBox::new(ptr::null_mut(), |p| {
            sqlite3_finalize(p);
        });
        let head = sql.as_ptr() as *const c_char;
        let mut tail: *const c_char = ptr::null();
        let rc = sqlite3_prepare_v2(
            connection,
            head,
            sql.len() as c_int,
            &mut *statement,
            &mut tail,
        );
        if rc != SQLITE_OK {
            let error = Error::msg(error_message_from_ptr(sqlite3_errmsg(connection)))
                .context(format!("While preparing the query:\n{}", truncate_long!(sql)));
            log::error!("{:#}", error);
            return Err(error);
        }
        let consumed = if tail.is_null() {
            sql.len()
        } else {
            tail.offset_from(head) as usize
        };
        Ok((statement, consumed))
    }
}

/// Step `statement` to completion.
///
/// Statements returning no columns yield a single [`RowsAffected`].
fn run_statement(
    connection: CBox<*mut sqlite3>,
    statement: CBox<*mut sqlite3_stmt>,
) -> impl Stream<Item = Result<QueryResult>> + Send + 'static {
    try_stream! {
        let count = unsafe { sqlite3_column_count(*statement) };
        let labels = (0..count)
            .map(|i| extract_name(*statement, i))
            .collect::<Result<RowNames>>()?;
        let total_changes = unsafe { sqlite3_total_changes(*connection) };
        let last_rowid = unsafe { sqlite3_last_insert_rowid(*connection) };
        loop {
            let rc = unsafe { sqlite3_step(*statement) };
            match rc {
                SQLITE_ROW => {
                    let values = (0..count)
                        .map(|i| extract_value(*statement, i))
                        .collect::<Result<Row>>()?;
                    yield QueryResult::Row(RowLabeled::new(labels.clone(), values));
                }
                SQLITE_DONE => break,
                SQLITE_BUSY => yield_now().await,
                _ => {
                    let error = Error::msg(error_message_from_ptr(unsafe {
                        sqlite3_errmsg(*connection)
                    }));
                    log::error!("{:#}", error);
                    Err::<(), _>(error)?;
                }
            }
        }
        if count == 0 {
            let changed = unsafe { sqlite3_total_changes(*connection) } != total_changes;
            let rows_affected = if changed {
                unsafe { sqlite3_changes(*connection) }.max(0) as u64
            } else {
                0
            };
            let rowid = unsafe { sqlite3_last_insert_rowid(*connection) };
            yield QueryResult::Affected(RowsAffected {
                rows_affected,
                last_affected_id: (rowid != last_rowid).then_some(rowid),
            });
        }
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &SqliteDriver {
        &SqliteDriver {}
    }

    async fn prepare(&mut self, query: String) -> Result<Query<SqliteDriver>> {
        let connection = self.handle();
        let statement = spawn_blocking(move || {
            let (statement, consumed) = prepare_one(*connection, &query)?;
            let context = || format!("While preparing the query:\n{}", truncate_long!(query));
            if !query[consumed..].trim().is_empty() {
                let error = Error::msg("Cannot prepare more than one statement at a time")
                    .context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
            if statement.is_null() {
                let error = Error::msg("The query holds no statement").context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
            Ok(statement)
        })
        .await??;
        Ok(Query::Prepared(SqlitePrepared::new(statement)))
    }

    fn run(&mut self, query: Query<SqliteDriver>) -> impl Stream<Item = Result<QueryResult>> + Send {
        match query {
            Query::Raw(sql) => Either::Left(self.run_unprepared(sql)),
            Query::Prepared(prepared) => {
                Either::Right(run_statement(self.handle(), prepared.statement))
            }
        }
    }
}

impl Connection for SqliteConnection {
    /// Open `sqlite://path?params`.
    ///
    /// The path and parameters are handed to SQLite as a `file:` URI, so
    /// `sqlite://:memory:` and `sqlite://data.db?mode=ro` both work. Foreign
    /// keys are enforced on the new connection.
    async fn connect(url: &str) -> Result<SqliteConnection> {
        let prefix = format!("{}://", SqliteDriver::NAME);
        let Some(location) = url.strip_prefix(&prefix) else {
            return Err(Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            )));
        };
        let context = || format!("Error while decoding connection URL: `{}`", url);
        let (path, params) = location.split_once('?').unwrap_or((location, ""));
        let path = urlencoding::decode(path).with_context(context)?;
        let mut uri = format!("file:{}", path);
        if !params.is_empty() {
            let params = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(url::form_urlencoded::parse(params.as_bytes()))
                .finish();
            uri.push('?');
            uri.push_str(&params);
        }
        let uri = CString::new(uri).with_context(context)?;
        let mut connection = CBox::new(ptr::null_mut(), |p| {
            unsafe { sqlite3_close(p) };
        });
        let rc = unsafe {
            sqlite3_open_v2(
                uri.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            )
        };
        if rc != SQLITE_OK {
            let message = if connection.is_null() {
                "Out of memory".to_string()
            } else {
                error_message_from_ptr(unsafe { sqlite3_errmsg(*connection) })
            };
            let error = Error::msg(message).context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let mut result = Self { connection };
        result
            .execute(Query::Raw("PRAGMA foreign_keys = ON;".into()))
            .await?;
        log::debug!("Connected to `{}`", url);
        Ok(result)
    }

    async fn begin(&mut self) -> Result<SqliteTransaction<'_>> {
        SqliteTransaction::new(self).await
    }
}
