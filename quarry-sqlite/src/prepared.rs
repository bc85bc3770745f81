use crate::{CBox, error_message_from_ptr};
use libsqlite3_sys::*;
use quarry_core::{Error, Prepared, Result, Value, truncate_long};
use rust_decimal::prelude::ToPrimitive;
use std::{
    ffi::{CStr, c_int},
    fmt::{self, Display},
    os::raw::{c_char, c_void},
};
use time::{format_description::well_known::Rfc3339, macros::format_description};

pub struct SqlitePrepared {
    pub(crate) statement: CBox<*mut sqlite3_stmt>,
    pub(crate) index: u64,
}

impl SqlitePrepared {
    pub(crate) fn new(statement: CBox<*mut sqlite3_stmt>) -> Self {
        unsafe {
            sqlite3_clear_bindings(*statement);
        }
        Self {
            statement,
            index: 0,
        }
    }

    fn bind_text(&mut self, index: c_int, value: &str) -> c_int {
        unsafe {
            sqlite3_bind_text(
                *self.statement,
                index,
                value.as_ptr() as *const c_char,
                value.len() as c_int,
                SQLITE_TRANSIENT(),
            )
        }
    }

    fn bind_integer(&mut self, index: c_int, value: i64) -> c_int {
        unsafe { sqlite3_bind_int64(*self.statement, index, value) }
    }
}

impl Prepared for SqlitePrepared {
    fn bind_value(&mut self, value: Value, index: u64) -> Result<&mut Self> {
        // SQLite parameters are numbered from 1
        let position = index as c_int + 1;
        let rc = match &value {
            Value::Null
            | Value::Boolean(None)
            | Value::Int8(None)
            | Value::Int16(None)
            | Value::Int32(None)
            | Value::Int64(None)
            | Value::UInt8(None)
            | Value::UInt16(None)
            | Value::UInt32(None)
            | Value::UInt64(None)
            | Value::Float32(None)
            | Value::Float64(None)
            | Value::Decimal(None)
            | Value::Varchar(None)
            | Value::Blob(None)
            | Value::Date(None)
            | Value::Time(None)
            | Value::Timestamp(None)
            | Value::TimestampWithTimezone(None)
            | Value::Uuid(None) => unsafe { sqlite3_bind_null(*self.statement, position) },
            Value::Boolean(Some(v)) => self.bind_integer(position, *v as i64),
            Value::Int8(Some(v)) => self.bind_integer(position, *v as i64),
            Value::Int16(Some(v)) => self.bind_integer(position, *v as i64),
            Value::Int32(Some(v)) => self.bind_integer(position, *v as i64),
            Value::Int64(Some(v)) => self.bind_integer(position, *v),
            Value::UInt8(Some(v)) => self.bind_integer(position, *v as i64),
            Value::UInt16(Some(v)) => self.bind_integer(position, *v as i64),
            Value::UInt32(Some(v)) => self.bind_integer(position, *v as i64),
            Value::UInt64(Some(v)) => {
                let Ok(v) = i64::try_from(*v) else {
                    return Err(Error::msg(format!(
                        "Cannot bind u64 value `{}` into a SQLite integer because it's out of bounds",
                        v
                    )));
                };
                self.bind_integer(position, v)
            }
            Value::Float32(Some(v)) => unsafe {
                sqlite3_bind_double(*self.statement, position, *v as f64)
            },
            Value::Float64(Some(v)) => unsafe {
                sqlite3_bind_double(*self.statement, position, *v)
            },
            Value::Decimal(Some(v)) => {
                let v = v.to_f64().ok_or_else(|| {
                    Error::msg(format!("Cannot convert the Decimal value `{}` to f64", v))
                })?;
                unsafe { sqlite3_bind_double(*self.statement, position, v) }
            }
            Value::Varchar(Some(v)) => self.bind_text(position, v),
            Value::Blob(Some(v)) => unsafe {
                sqlite3_bind_blob(
                    *self.statement,
                    position,
                    v.as_ptr() as *const c_void,
                    v.len() as c_int,
                    SQLITE_TRANSIENT(),
                )
            },
            Value::Date(Some(v)) => {
                let v = v.format(format_description!("[year]-[month]-[day]"))?;
                self.bind_text(position, &v)
            }
            Value::Time(Some(v)) => {
                let v = v.format(format_description!(
                    "[hour]:[minute]:[second].[subsecond]"
                ))?;
                self.bind_text(position, &v)
            }
            Value::Timestamp(Some(v)) => {
                let v = v.format(format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"
                ))?;
                self.bind_text(position, &v)
            }
            Value::TimestampWithTimezone(Some(v)) => {
                let v = v.format(&Rfc3339)?;
                self.bind_text(position, &v)
            }
            Value::Uuid(Some(v)) => self.bind_text(position, &v.to_string()),
            Value::List(..) => {
                let error = Error::msg(format!("Cannot use a {:?} as a query parameter", value));
                log::error!("{:#}", error);
                return Err(error);
            }
        };
        if rc != SQLITE_OK {
            let error = unsafe {
                let db = sqlite3_db_handle(*self.statement);
                let query = sqlite3_sql(*self.statement);
                let query = if query.is_null() {
                    String::new()
                } else {
                    CStr::from_ptr(query).to_string_lossy().into_owned()
                };
                Error::msg(error_message_from_ptr(sqlite3_errmsg(db))).context(format!(
                    "Cannot bind parameter {} to query:\n{}",
                    position,
                    truncate_long!(query)
                ))
            };
            log::error!("{:#}", error);
            return Err(error);
        }
        self.index = self.index.max(index + 1);
        Ok(self)
    }

    fn bound(&self) -> u64 {
        self.index
    }

    fn clear_bindings(&mut self) -> Result<&mut Self> {
        let rc = unsafe { sqlite3_clear_bindings(*self.statement) };
        if rc != SQLITE_OK {
            return Err(Error::msg("Could not clear the bindings"));
        }
        self.index = 0;
        Ok(self)
    }
}

impl Display for SqlitePrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", *self.statement)
    }
}
