//! Bilingual (English / Chinese) text resources.
//!
//! Every user-facing label lives in a static [`Strings`] table; front-ends pick a
//! table with [`strings`] and never hard-code text.

use clap::ValueEnum;

use crate::data::PointError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }

    /// Parse a language code such as `en`, `zh`, `zh-CN` or `en_US.UTF-8`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        if code.starts_with("zh") {
            Some(Language::Zh)
        } else if code.starts_with("en") {
            Some(Language::En)
        } else {
            None
        }
    }
}

pub struct Strings {
    pub lang: Language,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub language_switch: &'static str,
    pub status_waiting: &'static str,
    pub status_training: &'static str,
    pub status_ready: &'static str,
    pub section_training: &'static str,
    pub section_prediction: &'static str,
    pub table_title: &'static str,
    pub col_id: &'static str,
    pub col_dose: &'static str,
    pub col_response: &'static str,
    pub col_fitted: &'static str,
    pub col_residual: &'static str,
    pub editable: &'static str,
    pub locked: &'static str,
    pub no_data: &'static str,
    pub dose_unit: &'static str,
    pub response_unit: &'static str,
    pub placeholder_dose: &'static str,
    pub placeholder_response: &'static str,
    pub validation_number: &'static str,
    pub validation_dose: &'static str,
    pub validation_response: &'static str,
    pub validation_unknown: &'static str,
    pub formula_title: &'static str,
    pub legend_curvature: &'static str,
    pub legend_linear: &'static str,
    pub legend_intercept: &'static str,
    pub chart_title: &'static str,
    pub chart_x: &'static str,
    pub chart_y: &'static str,
    pub input_label: &'static str,
    pub output_label: &'static str,
    pub pred_need_train: &'static str,
    pub info_text: &'static str,
    pub btn_train: &'static str,
    pub btn_training: &'static str,
    pub btn_trained: &'static str,
    pub btn_reset: &'static str,
    pub need_points: &'static str,
    pub data_reset: &'static str,
    pub summary_title: &'static str,
    pub quality_title: &'static str,
    pub help_idle: &'static str,
    pub help_running: &'static str,
    pub help_trained: &'static str,
    pub help_form: &'static str,
}

impl Strings {
    /// Localized message for a rejected point.
    pub fn point_error(&self, err: &PointError) -> String {
        match err {
            PointError::NotANumber => self.validation_number.to_string(),
            PointError::DoseOutOfRange(_) => self.validation_dose.to_string(),
            PointError::ResponseOutOfRange(_) => self.validation_response.to_string(),
            PointError::UnknownId(id) => format!("{} ({id})", self.validation_unknown),
        }
    }

    pub fn converged_after(&self, ticks: u64) -> String {
        match self.lang {
            Language::En => format!("Training converged after {ticks} steps."),
            Language::Zh => format!("训练在 {ticks} 步后收敛。"),
        }
    }

    pub fn training_progress(&self, ticks: u64) -> String {
        match self.lang {
            Language::En => format!("Training... step {ticks}"),
            Language::Zh => format!("训练中……第 {ticks} 步"),
        }
    }

    pub fn point_added(&self, dose: f64, response: f64) -> String {
        match self.lang {
            Language::En => format!("Added point ({dose} {}, {response} {}).", self.dose_unit, self.response_unit),
            Language::Zh => format!("已添加数据点 ({dose} {}, {response} {})。", self.dose_unit, self.response_unit),
        }
    }

    pub fn point_deleted(&self, id: &str) -> String {
        match self.lang {
            Language::En => format!("Deleted point {id}."),
            Language::Zh => format!("已删除数据点 {id}。"),
        }
    }

    pub fn wrote_file(&self, path: &std::path::Path) -> String {
        match self.lang {
            Language::En => format!("Wrote {}", path.display()),
            Language::Zh => format!("已写入 {}", path.display()),
        }
    }
}

pub fn strings(lang: Language) -> &'static Strings {
    match lang {
        Language::En => &EN,
        Language::Zh => &ZH,
    }
}

static EN: Strings = Strings {
    lang: Language::En,
    title: "Dose-Response Model Trainer",
    subtitle: "Fit a quadratic curve to dose / blood-pressure data",
    language_switch: "中文",
    status_waiting: "Waiting for training",
    status_training: "Training",
    status_ready: "Model ready",
    section_training: "1. Training data & model",
    section_prediction: "2. Prediction playground",
    table_title: "Training data",
    col_id: "#",
    col_dose: "Dose",
    col_response: "Blood pressure",
    col_fitted: "Fitted",
    col_residual: "Residual",
    editable: "Editable",
    locked: "Locked",
    no_data: "No data points.",
    dose_unit: "mg",
    response_unit: "mmHg",
    placeholder_dose: "Dose (0-60)",
    placeholder_response: "BP (0-250)",
    validation_number: "Please enter valid numbers.",
    validation_dose: "Dose must be between 0 and 60 mg.",
    validation_response: "Blood pressure must be between 0 and 250 mmHg.",
    validation_unknown: "No such data point.",
    formula_title: "Current model formula",
    legend_curvature: "a: curvature",
    legend_linear: "b: linear trend",
    legend_intercept: "c: baseline",
    chart_title: "Dose vs. blood pressure",
    chart_x: "dose (mg)",
    chart_y: "BP (mmHg)",
    input_label: "Input dose",
    output_label: "Predicted blood pressure",
    pred_need_train: "Train the model first",
    info_text: "Edit the points, then train: the curve slides from a flat line to the best fit.",
    btn_train: "Train model",
    btn_training: "Training...",
    btn_trained: "Trained",
    btn_reset: "Reset data",
    need_points: "At least 3 points are needed to train.",
    data_reset: "Data reset to the 10 demonstration points.",
    summary_title: "Quadratic dose-response fit",
    quality_title: "Fit quality",
    help_idle: "t train  a add  x delete  ↑/↓ select  r reset  l language  q quit",
    help_running: "r reset  l language  q quit",
    help_trained: "←/→ dose  PgUp/PgDn ±10  e export trace  r reset  l language  q quit",
    help_form: "Tab switch field  Enter add  Esc cancel",
};

static ZH: Strings = Strings {
    lang: Language::Zh,
    title: "剂量-反应模型训练演示",
    subtitle: "用二次曲线拟合剂量与血压数据",
    language_switch: "English",
    status_waiting: "等待训练",
    status_training: "训练中",
    status_ready: "模型就绪",
    section_training: "1. 训练数据与模型",
    section_prediction: "2. 预测演练场",
    table_title: "训练数据",
    col_id: "#",
    col_dose: "剂量",
    col_response: "血压",
    col_fitted: "拟合值",
    col_residual: "残差",
    editable: "可编辑",
    locked: "已锁定",
    no_data: "暂无数据点。",
    dose_unit: "mg",
    response_unit: "mmHg",
    placeholder_dose: "剂量 (0-60)",
    placeholder_response: "血压 (0-250)",
    validation_number: "请输入有效的数字。",
    validation_dose: "剂量必须在 0 到 60 mg 之间。",
    validation_response: "血压必须在 0 到 250 mmHg 之间。",
    validation_unknown: "数据点不存在。",
    formula_title: "当前模型公式",
    legend_curvature: "a：曲率",
    legend_linear: "b：线性趋势",
    legend_intercept: "c：基线",
    chart_title: "剂量与血压",
    chart_x: "剂量 (mg)",
    chart_y: "血压 (mmHg)",
    input_label: "输入剂量",
    output_label: "预测血压",
    pred_need_train: "请先训练模型",
    info_text: "编辑数据点后开始训练：曲线会从水平线逐步逼近最佳拟合。",
    btn_train: "训练模型",
    btn_training: "训练中……",
    btn_trained: "已训练",
    btn_reset: "重置数据",
    need_points: "至少需要 3 个数据点才能训练。",
    data_reset: "数据已重置为 10 个演示点。",
    summary_title: "二次剂量-反应拟合",
    quality_title: "拟合质量",
    help_idle: "t 训练  a 添加  x 删除  ↑/↓ 选择  r 重置  l 语言  q 退出",
    help_running: "r 重置  l 语言  q 退出",
    help_trained: "←/→ 剂量  PgUp/PgDn ±10  e 导出记录  r 重置  l 语言  q 退出",
    help_form: "Tab 切换输入框  Enter 添加  Esc 取消",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_code("zh-CN"), Some(Language::Zh));
        assert_eq!(Language::from_code("en_US.UTF-8"), Some(Language::En));
        assert_eq!(Language::from_code(" ZH "), Some(Language::Zh));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(Language::En.toggle(), Language::Zh);
        assert_eq!(Language::En.toggle().toggle(), Language::En);
    }

    #[test]
    fn tables_match_their_language() {
        assert_eq!(strings(Language::En).lang, Language::En);
        assert_eq!(strings(Language::Zh).lang, Language::Zh);
        assert_ne!(strings(Language::En).title, strings(Language::Zh).title);
    }

    #[test]
    fn point_errors_are_localized() {
        let en = strings(Language::En).point_error(&PointError::DoseOutOfRange(99.0));
        let zh = strings(Language::Zh).point_error(&PointError::DoseOutOfRange(99.0));
        assert!(en.contains("60"));
        assert!(zh.contains("剂量"));
    }
}
