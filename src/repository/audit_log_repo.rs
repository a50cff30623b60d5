// ==========================================
// 沉睡账号点赞分拣系统 - 审计日志数据仓储
// ==========================================
// 红线: 只追加。本仓储不提供任何 UPDATE / DELETE 路径
// 用途: 历史复盘的唯一事实来源, 与可变的点赞/冷却状态解耦
// ==========================================

mod core;
mod queries;


pub use core::AuditLogRepository;
