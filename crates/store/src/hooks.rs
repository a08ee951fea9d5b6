//! Injectable pre-commit write hooks
//!
//! A hook is explicit function-injection, not implicit dispatch: hooks are
//! registered on the store at construction time and invoked synchronously
//! on the write path, before the atomic conditional write. A hook may
//! transform the candidate payload (normalization, audit stamping) or veto
//! the operation by returning an error, in which case nothing reaches the
//! backend.
//!
//! Hooks are good for cross-cutting concerns: validating fields,
//! normalizing data, stamping audit metadata. They never see internal
//! storage, only the candidate payload and the request-scoped
//! `WriteContext`.

use verstore_core::{Result, Value, WriteContext, WriteOp};

/// Pre-commit logic invoked on the write path
///
/// Called once per registered hook, in registration order, before the
/// conditional write. An `Err` aborts the operation; the store reports it
/// as `Error::HookRejected` and the record is left untouched.
///
/// For `WriteOp::Delete` the candidate payload is `Value::Null` (nothing
/// is being written); delete hooks are veto-only.
pub trait WriteHook: Send + Sync {
    /// Name used in rejection errors and logs
    fn name(&self) -> &str;

    /// Inspect or transform the candidate payload before it is committed
    fn before_write(&self, op: WriteOp, ctx: &WriteContext, payload: &mut Value) -> Result<()>;
}

/// Function hooks: any matching closure is a `WriteHook`
///
/// Rejection errors from closures are reported under the name "fn".
impl<F> WriteHook for F
where
    F: Fn(WriteOp, &WriteContext, &mut Value) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        "fn"
    }

    fn before_write(&self, op: WriteOp, ctx: &WriteContext, payload: &mut Value) -> Result<()> {
        self(op, ctx, payload)
    }
}

/// Audit stamping hook
///
/// Writes the acting identity into object payloads: `created_by` on
/// insert, `updated_by` on insert and update. Non-object payloads and
/// deletes pass through untouched, as do writes with an anonymous context.
#[derive(Debug, Clone, Default)]
pub struct AuditHook;

impl AuditHook {
    /// Field stamped with the creating actor
    pub const CREATED_BY: &'static str = "created_by";
    /// Field stamped with the last updating actor
    pub const UPDATED_BY: &'static str = "updated_by";

    /// Create a new audit hook
    pub fn new() -> Self {
        Self
    }
}

impl WriteHook for AuditHook {
    fn name(&self) -> &str {
        "audit"
    }

    fn before_write(&self, op: WriteOp, ctx: &WriteContext, payload: &mut Value) -> Result<()> {
        let Some(actor) = ctx.actor() else {
            return Ok(());
        };
        let actor = Value::from(actor.as_str());

        match op {
            WriteOp::Insert => {
                payload.set_field(Self::CREATED_BY, actor.clone());
                payload.set_field(Self::UPDATED_BY, actor);
            }
            WriteOp::Update => {
                payload.set_field(Self::UPDATED_BY, actor);
            }
            WriteOp::Delete => {}
        }
        Ok(())
    }
}
