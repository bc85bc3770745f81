#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlAlterTable,
    SqlCreateTable,
    SqlCreateTableForeignKey,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlDropTable,
    SqlInsertInto,
    SqlInsertIntoValues,
    SqlJoin,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectGroupBy,
    SqlSelectLimit,
    SqlSelectOrderBy,
    SqlSelectWhere,
    SqlUpdate,
    SqlUpdateSet,
    SqlUpdateWhere,
}

/// Where in a statement the writer currently is.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlContext {
    pub fragment: Fragment,
}

impl SqlContext {
    pub fn new(fragment: Fragment) -> Self {
        Self { fragment }
    }

    pub fn switch_fragment(&self, fragment: Fragment) -> SqlContext {
        SqlContext { fragment, ..*self }
    }
}
