//! Confirmer Port - 交互确认

/// 在继续耗时的生成阶段前征求确认
pub trait ConfirmerPort: Send + Sync {
    /// 返回 true 表示继续
    fn confirm(&self, question: &str) -> bool;
}

/// 总是同意
pub struct AlwaysConfirm;

impl ConfirmerPort for AlwaysConfirm {
    fn confirm(&self, _question: &str) -> bool {
        true
    }
}
