//! Session controller
//!
//! Owns everything that lives for one visit: the backend session id, the
//! chart snapshot, the conversation and the chart tab. Views borrow from it;
//! nothing else holds state.

use std::sync::Arc;

use tracing::info;

use crate::api::Backend;
use crate::chart::{ChartSnapshot, ChartView, DisplayTab};
use crate::conversation::{Conversation, FocusContext, Settled};
use crate::error::{ClientError, Result};
use crate::intake::IntakeForm;
use crate::notify::Notifier;

/// Backend session id plus its chart; never changes once created
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    chart: Arc<ChartSnapshot>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chart(&self) -> &ChartSnapshot {
        &self.chart
    }

    /// Shared handle for views that outlive a borrow of the controller
    pub fn chart_handle(&self) -> Arc<ChartSnapshot> {
        Arc::clone(&self.chart)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intake,
    Consultation,
}

#[derive(Debug)]
struct ActiveSession {
    session: Session,
    conversation: Conversation,
}

/// Top-level state container
#[derive(Debug, Default)]
pub struct SessionController {
    active: Option<ActiveSession>,
    view: ChartView,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.active.is_some() {
            Phase::Consultation
        } else {
            Phase::Intake
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.active.as_ref().map(|a| &a.session)
    }

    pub fn chart(&self) -> Option<&ChartSnapshot> {
        self.session().map(Session::chart)
    }

    pub fn conversation(&self) -> Result<&Conversation> {
        self.active
            .as_ref()
            .map(|a| &a.conversation)
            .ok_or(ClientError::NoSession)
    }

    fn conversation_mut(&mut self) -> Result<&mut Conversation> {
        self.active
            .as_mut()
            .map(|a| &mut a.conversation)
            .ok_or(ClientError::NoSession)
    }

    /// Install a new session and switch to consultation
    ///
    /// Any previous session is replaced wholesale, transcript included.
    pub fn start_session(&mut self, session_id: impl Into<String>, chart: ChartSnapshot) {
        let session = Session {
            id: session_id.into(),
            chart: Arc::new(chart),
        };
        let conversation = Conversation::new(session.id.clone(), &session.chart);
        if let Some(previous) = &self.active {
            info!("replacing session {}", previous.session.id);
        }
        info!("session {} started", session.id);

        self.view = ChartView::new();
        self.active = Some(ActiveSession { session, conversation });
    }

    /// Drop the session, chart and transcript; back to intake
    pub fn reset_session(&mut self) {
        if let Some(previous) = self.active.take() {
            info!(
                "session {} reset ({} messages discarded)",
                previous.session.id,
                previous.conversation.transcript().len()
            );
        }
        self.view = ChartView::new();
    }

    /// Submit the intake form and start a session from the reply
    ///
    /// On any failure the controller stays in intake.
    pub async fn submit_intake(
        &mut self,
        form: &IntakeForm,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<&Session> {
        if self.phase() == Phase::Consultation {
            return Err(ClientError::SessionActive);
        }

        let response = form.submit(backend, notifier).await?;
        self.start_session(response.session_id, response.chart_data);
        self.session().ok_or(ClientError::NoSession)
    }

    pub async fn send(
        &mut self,
        backend: &dyn Backend,
        text: &str,
        notifier: &dyn Notifier,
    ) -> Result<Settled> {
        self.conversation_mut()?.send(backend, text, notifier).await
    }

    pub async fn ask_suggested(
        &mut self,
        backend: &dyn Backend,
        index: usize,
        notifier: &dyn Notifier,
    ) -> Result<Settled> {
        self.conversation_mut()?
            .ask_suggested(backend, index, notifier)
            .await
    }

    pub fn set_focus(&mut self, focus: FocusContext) -> Result<()> {
        self.conversation_mut()?.set_focus(focus);
        Ok(())
    }

    pub fn chart_tab(&self) -> DisplayTab {
        self.view.tab()
    }

    pub fn select_tab(&mut self, tab: DisplayTab) {
        self.view.select(tab);
    }

    /// Current tab of the chart; empty in intake
    pub fn render_chart(&self) -> String {
        self.view.render(self.chart())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::sample_snapshot;

    #[test]
    fn test_starts_in_intake() {
        let controller = SessionController::new();
        assert_eq!(controller.phase(), Phase::Intake);
        assert!(controller.session().is_none());
        assert!(matches!(controller.conversation(), Err(ClientError::NoSession)));
        assert_eq!(controller.render_chart(), "");
    }

    #[test]
    fn test_start_session_installs_values_unchanged() {
        let chart = sample_snapshot();
        let mut controller = SessionController::new();
        controller.start_session("session_42", chart.clone());

        assert_eq!(controller.phase(), Phase::Consultation);
        let session = controller.session().unwrap();
        assert_eq!(session.id(), "session_42");
        assert_eq!(session.chart(), &chart);
        assert_eq!(controller.conversation().unwrap().session_id(), "session_42");
        assert_eq!(controller.conversation().unwrap().transcript().len(), 1);
    }

    #[test]
    fn test_reset_returns_to_intake() {
        let mut controller = SessionController::new();
        controller.start_session("s", sample_snapshot());
        controller.select_tab(DisplayTab::Houses);

        controller.reset_session();

        assert_eq!(controller.phase(), Phase::Intake);
        assert!(controller.chart().is_none());
        assert!(controller.conversation().is_err());
        assert_eq!(controller.chart_tab(), DisplayTab::Overview);

        // idempotent
        controller.reset_session();
        assert_eq!(controller.phase(), Phase::Intake);
    }

    #[test]
    fn test_focus_requires_session() {
        let mut controller = SessionController::new();
        assert!(matches!(
            controller.set_focus(FocusContext::Health),
            Err(ClientError::NoSession)
        ));

        controller.start_session("s", sample_snapshot());
        controller.set_focus(FocusContext::Health).unwrap();
        assert_eq!(controller.conversation().unwrap().focus(), FocusContext::Health);
    }

    #[test]
    fn test_chart_handle_is_shared() {
        let mut controller = SessionController::new();
        controller.start_session("s", sample_snapshot());
        let handle = controller.session().unwrap().chart_handle();
        controller.reset_session();
        assert_eq!(handle.ascendant.sign, "Leo");
    }
}
