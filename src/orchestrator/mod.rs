//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整次运行的流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `pipeline` - 翻译流水线
//! - 严格串行地遍历页面（Vec<Page>）
//! - 每页成功后立即追加产物文件并落盘
//! - 有思考内容的页面重写思考日志快照
//! - 单页失败只跳过该页，不中断运行
//! - 页与页之间按固定间隔限速
//! - 输出整次运行的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! pipeline (处理 Vec<Page>)
//!     ↓
//! services::Translator (处理单个 Page)
//!     ↓
//! engine (生成引擎：ollama / openai / mock)
//! ```
//!
//! ## 设计原则
//!
//! 1. **串行执行**：第 i+1 页永远在第 i 页终态之后才开始
//! 2. **资源独占**：产物文件与思考日志只由流水线写入
//! 3. **向下依赖**：编排层 → services → engine
//! 4. **无业务逻辑**：只做调度、落盘和统计

pub mod pipeline;

// 重新导出主要类型
pub use pipeline::{Pipeline, RunReport, RunStats};
