//! WalkthroughBlueprint - Config Loader 输出
//!
//! 描述一次完整的演练：两个数据源、连接方式、分析参数、输出路由。

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{Field, JoinKind, NullKeyPolicy};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的演练配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WalkthroughBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 数据源
    #[validate(nested)]
    pub sources: SourcesConfig,

    /// 连接配置 (必填，连接方式不提供默认值)
    #[validate(nested)]
    pub join: JoinConfig,

    /// 分析参数
    #[serde(default)]
    #[validate(nested)]
    pub analysis: AnalysisConfig,

    /// 输出路由配置
    #[serde(default = "default_sinks")]
    #[validate(nested)]
    pub sinks: Vec<SinkConfig>,
}

/// 两个输入数据源
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourcesConfig {
    /// 客户表
    #[validate(nested)]
    pub customers: SourceConfig,

    /// 订单表
    #[validate(nested)]
    pub orders: SourceConfig,
}

/// 单个分隔文本数据源
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    /// 文件路径
    #[validate(length(min = 1, message = "source path cannot be empty"))]
    pub path: String,

    /// 首行是否为表头
    #[serde(default = "default_true")]
    pub has_header: bool,

    /// 是否推断列类型 (false 时全部为 string)
    #[serde(default = "default_true")]
    pub infer_schema: bool,

    /// 分隔符，必须是单字节 ASCII
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// 声明的列定义 (优先于推断)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Field>>,

    /// 类型推断采样行数 (None = 全部行)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "sample_rows must be >= 1"))]
    pub sample_rows: Option<usize>,

    /// 额外视为 null 的取值 (空字段总是 null)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub null_values: Vec<String>,
}

impl SourceConfig {
    /// 使用默认读取选项的数据源
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            has_header: true,
            infer_schema: true,
            delimiter: default_delimiter(),
            columns: None,
            sample_rows: None,
            null_values: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }
}

/// 连接配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinConfig {
    /// 连接列
    #[validate(length(min = 1, message = "join column cannot be empty"))]
    pub on: String,

    /// 连接方式
    pub how: JoinKind,
}

/// 分析步骤参数
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalysisConfig {
    /// 每个排行榜输出的行数
    #[serde(default = "default_top_n")]
    #[validate(range(min = 0, message = "top_n must be >= 0"))]
    pub top_n: i64,

    /// 客户表分组列
    #[serde(default = "default_customer_group_by")]
    #[validate(length(min = 1, message = "customer_group_by cannot be empty"))]
    pub customer_group_by: Vec<String>,

    /// 订单表分组列
    #[serde(default = "default_order_group_by")]
    #[validate(length(min = 1, message = "order_group_by cannot be empty"))]
    pub order_group_by: Vec<String>,

    /// 连接结果分组列
    #[serde(default = "default_customer_group_by")]
    #[validate(length(min = 1, message = "joined_group_by cannot be empty"))]
    pub joined_group_by: Vec<String>,

    /// null 分组键处理
    #[serde(default)]
    pub null_keys: NullKeyPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            customer_group_by: default_customer_group_by(),
            order_group_by: default_order_group_by(),
            joined_group_by: default_customer_group_by(),
            null_keys: NullKeyPolicy::default(),
        }
    }
}

/// Sink 输出配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SinkConfig {
    /// Sink 名称
    #[validate(length(min = 1, message = "sink name cannot be empty"))]
    pub name: String,

    /// Sink 类型
    pub sink_type: SinkType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// 表格输出到 stdout
    Console,
    /// tracing 日志
    Log,
    /// 每个步骤一行 JSON
    Json,
}

fn default_true() -> bool {
    true
}

fn default_delimiter() -> char {
    ','
}

fn default_top_n() -> i64 {
    10
}

fn default_customer_group_by() -> Vec<String> {
    vec!["customer_state".to_string()]
}

fn default_order_group_by() -> Vec<String> {
    vec!["order_status".to_string()]
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![SinkConfig {
        name: "console".to_string(),
        sink_type: SinkType::Console,
        params: HashMap::new(),
    }]
}
