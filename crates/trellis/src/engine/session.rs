use trellis_core::{
    driver::Param,
    schema::FieldSchema,
    stmt::{Expr, ExprParam, StmtId, Value},
};

/// Per-call builder state: alias and statement counters plus the ordered
/// parameter list. Never shared across calls, so no synchronization.
#[derive(Debug, Default)]
pub(crate) struct BuilderSession {
    aliases: u32,
    stmts: u32,
    params: Vec<Param>,
}

impl BuilderSession {
    pub(crate) fn new() -> BuilderSession {
        BuilderSession::default()
    }

    /// Fresh table alias, unique within the call: `t0`, `t1`, ...
    pub(crate) fn table_alias(&mut self) -> String {
        let n = self.aliases;
        self.aliases += 1;
        format!("t{n}")
    }

    /// Fresh statement identifier; CTE aliases derive from it.
    pub(crate) fn stmt_id(&mut self) -> StmtId {
        let n = self.stmts;
        self.stmts += 1;
        StmtId(n)
    }

    /// Register a bound parameter and return the expression referencing it.
    /// Registration order is `$n` order.
    pub(crate) fn bind(&mut self, value: Value, schema: Option<&FieldSchema>) -> Expr {
        let index = self.params.len();
        self.params.push(Param::new(value, schema.cloned()));
        Expr::Param(ExprParam { index })
    }

    pub(crate) fn into_params(self) -> Vec<Param> {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_never_collide_within_a_session() {
        let mut session = BuilderSession::new();

        assert_eq!(session.table_alias(), "t0");
        assert_eq!(session.table_alias(), "t1");
        assert_eq!(session.stmt_id(), StmtId(0));
        assert_eq!(session.stmt_id(), StmtId(1));

        let first = session.bind(Value::I64(1), None);
        let second = session.bind(Value::I64(2), None);
        assert_eq!(first, Expr::Param(ExprParam { index: 0 }));
        assert_eq!(second, Expr::Param(ExprParam { index: 1 }));

        let params = session.into_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].value, Value::I64(1));
        assert_eq!(params[1].value, Value::I64(2));
    }
}
