//! FSM errors: все non-fatal, caller получает Err и продолжает тик

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    /// Ни текущее состояние, ни его предки не разрешают trigger
    #[error("trigger `{trigger}` is not permitted in state `{state}`")]
    NotPermitted { state: String, trigger: String },

    /// Строка от perception collaborator не совпала ни с одним trigger
    #[error("unknown trigger name `{0}`")]
    UnknownTrigger(String),

    /// Владелец машины мёртв — trigger отброшен
    #[error("owner is dead, trigger `{0}` dropped")]
    Dead(String),
}
