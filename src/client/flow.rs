//! Screen Flow - 输入 / 加载 / 展示 三态机
//!
//! 单章节与整本书两个流程共用同一状态机，各状态拥有互不相交的数据

use super::error::ClientError;

/// 流程状态
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState<T> {
    /// 等待输入，可能带有上一次失败的提示
    Input { error: Option<String> },
    /// 请求进行中
    Loading,
    /// 展示结果
    Display(T),
}

impl<T> Default for FlowState<T> {
    fn default() -> Self {
        FlowState::Input { error: None }
    }
}

/// 流程状态机
#[derive(Debug)]
pub struct Flow<T> {
    state: FlowState<T>,
}

impl<T> Default for Flow<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Flow<T> {
    pub fn new() -> Self {
        Self {
            state: FlowState::default(),
        }
    }

    pub fn state(&self) -> &FlowState<T> {
        &self.state
    }

    /// 提交输入，进入 Loading
    ///
    /// 只能从 Input 开始；加载中或展示中的重复提交被拒绝
    pub fn begin(&mut self) -> Result<(), ClientError> {
        match self.state {
            FlowState::Input { .. } => {
                self.state = FlowState::Loading;
                Ok(())
            }
            FlowState::Loading => Err(ClientError::Application(
                "A request is already in progress".to_string(),
            )),
            FlowState::Display(_) => Err(ClientError::Application(
                "Start over before submitting again".to_string(),
            )),
        }
    }

    /// 请求结束：成功进入 Display，失败回到 Input 并附带提示
    pub fn finish(&mut self, result: Result<T, ClientError>) {
        if !matches!(self.state, FlowState::Loading) {
            tracing::debug!("Ignoring result outside of Loading");
            return;
        }

        self.state = match result {
            Ok(value) => FlowState::Display(value),
            Err(e) => {
                tracing::warn!(error = %e, "Request failed");
                FlowState::Input {
                    error: Some(e.user_message()),
                }
            }
        };
    }

    /// 返回输入界面
    pub fn reset(&mut self) {
        self.state = FlowState::default();
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FlowState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            FlowState::Display(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            FlowState::Display(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FlowState::Input { error } => error.as_deref(),
            _ => None,
        }
    }
}
