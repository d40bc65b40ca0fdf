//! 选项动画状态
//!
//! 每个选项一个 `Idle → Filling → Settled` 状态机，由作答状态驱动。
//! 这里只决定"哪个选项该开始填充"，填充曲线和时长由界面层决定。

use crate::models::McqOption;

/// 选项填充动画阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionPhase {
    #[default]
    Idle,
    Filling,
    Settled,
}

/// 一道题所有选项的动画状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionAnimator {
    phases: Vec<(String, OptionPhase)>,
}

impl OptionAnimator {
    pub fn new(options: &[McqOption]) -> Self {
        Self {
            phases: options
                .iter()
                .map(|o| (o.id.clone(), OptionPhase::Idle))
                .collect(),
        }
    }

    pub fn phase(&self, option_id: &str) -> OptionPhase {
        self.phases
            .iter()
            .find(|(id, _)| id == option_id)
            .map(|(_, phase)| *phase)
            .unwrap_or_default()
    }

    /// 用户选中某个选项：选中项开始填充，已知正确答案且不同则正确项也填充
    pub fn on_selected(&mut self, selected: &str, correct: Option<&str>) {
        self.start_filling(selected);
        if let Some(correct) = correct {
            if correct != selected {
                self.start_filling(correct);
            }
        }
    }

    /// 正确答案返回：与选中项不同时正确项开始填充
    pub fn on_revealed(&mut self, selected: &str, correct: &str) {
        if correct != selected {
            self.start_filling(correct);
        }
    }

    /// 界面层通知填充动画结束
    ///
    /// # 返回
    /// 该选项是否从 `Filling` 进入 `Settled`
    pub fn settle(&mut self, option_id: &str) -> bool {
        match self.slot(option_id) {
            Some(phase) if *phase == OptionPhase::Filling => {
                *phase = OptionPhase::Settled;
                true
            }
            _ => false,
        }
    }

    /// 选中项填充结束后触发庆祝效果
    pub fn celebration_ready(&self, selected: &str) -> bool {
        self.phase(selected) == OptionPhase::Settled
    }

    fn start_filling(&mut self, option_id: &str) {
        if let Some(phase) = self.slot(option_id) {
            if *phase == OptionPhase::Idle {
                *phase = OptionPhase::Filling;
            }
        }
    }

    fn slot(&mut self, option_id: &str) -> Option<&mut OptionPhase> {
        self.phases
            .iter_mut()
            .find(|(id, _)| id == option_id)
            .map(|(_, phase)| phase)
    }
}
