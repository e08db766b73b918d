//! Walkthrough 指标收集模块
//!
//! 记录分组、连接、步骤耗时和报表分发指标，并在内存中聚合步骤耗时。

use std::time::Duration;

use contracts::JoinKind;
use metrics::{counter, gauge, histogram};

/// 记录分组结果的组数
pub fn record_groups(keys: &str, groups: usize) {
    counter!("walkthrough_group_operations_total").increment(1);
    gauge!("walkthrough_groups", "keys" => keys.to_string()).set(groups as f64);
}

/// 记录连接输出行数和左侧未匹配行数
pub fn record_join(kind: JoinKind, rows: usize, unmatched: usize) {
    let kind = kind.to_string();
    counter!("walkthrough_join_rows_total", "kind" => kind.clone()).increment(rows as u64);
    if unmatched > 0 {
        counter!("walkthrough_join_unmatched_total", "kind" => kind).increment(unmatched as u64);
    }
}

/// 记录单个步骤耗时
pub fn record_step_duration_ms(step: &str, ms: f64) {
    histogram!("walkthrough_step_duration_ms", "step" => step.to_string()).record(ms);
}

/// 记录报表分发
pub fn record_report_dispatched(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "walkthrough_reports_dispatched_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 步骤耗时聚合器
///
/// 按记录顺序保存每个步骤的耗时，同时汇总所有步骤的统计量。
#[derive(Debug, Clone, Default)]
pub struct StepTimings {
    steps: Vec<(String, f64)>,
    overall: RunningStats,
}

impl StepTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个步骤，同时写入 histogram
    pub fn record(&mut self, step: impl Into<String>, elapsed: Duration) {
        let step = step.into();
        let ms = elapsed.as_secs_f64() * 1000.0;
        record_step_duration_ms(&step, ms);
        self.overall.push(ms);
        self.steps.push((step, ms));
    }

    /// (步骤, 毫秒)，按记录顺序
    pub fn steps(&self) -> &[(String, f64)] {
        &self.steps
    }

    pub fn get(&self, step: &str) -> Option<f64> {
        self.steps
            .iter()
            .find(|(name, _)| name == step)
            .map(|(_, ms)| *ms)
    }

    pub fn total_ms(&self) -> f64 {
        self.steps.iter().map(|(_, ms)| ms).sum()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(&self.overall)
    }
}

impl std::fmt::Display for StepTimings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Step Timings ===")?;
        for (step, ms) in &self.steps {
            writeln!(f, "  {:<28} {:>10.3} ms", step, ms)?;
        }
        writeln!(f, "Total: {:.3} ms", self.total_ms())?;
        writeln!(f, "Per step (ms): {}", self.summary())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
