//! 敏感操作审计
//!
//! 解锁、改分这类操作必须留痕。审计走结构化日志通道，
//! 由日志基础设施负责收集与保存；记录失败不影响业务结果。

use tracing::warn;

/// 审计事件
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: &'static str,
    pub actor_id: i64,
    pub class_offering_id: i64,
    pub student_id: Option<i64>,
    pub reason: Option<String>,
}

impl AuditEvent {
    pub fn new(action: &'static str, actor_id: i64, class_offering_id: i64) -> Self {
        Self {
            action,
            actor_id,
            class_offering_id,
            student_id: None,
            reason: None,
        }
    }

    pub fn student(mut self, student_id: i64) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// 记录审计事件
///
/// warn 级别：审计事件在生产环境的日志过滤级别下也必须可见。
pub fn record(event: AuditEvent) {
    warn!(
        audit = true,
        action = event.action,
        actor_id = event.actor_id,
        class_offering_id = event.class_offering_id,
        student_id = event.student_id,
        reason = event.reason.as_deref().unwrap_or(""),
        "audit event"
    );
}
