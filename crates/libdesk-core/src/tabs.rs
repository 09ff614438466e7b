//! Tab composition and activation-driven refresh.
//!
//! The `TabController` resolves the session role once, builds the fixed panel
//! set for it, and owns all display state. It is the state type of the UI
//! context: every command outcome is applied to it through a posted task.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, info};

use crate::api::CommandError;
use crate::dispatch::Dispatcher;
use crate::identity::{self, Role};
use crate::lifecycle::{ActivationState, Refreshable};
use crate::panels;
use crate::session::Session;

/// Every panel the client knows how to compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Search,
    Shelf,
    CurrentBorrows,
    History,
    Recommendation,
    Reference,
    Management,
    BorrowAdmin,
    Statistics,
    RecommendationAdmin,
}

impl PanelKind {
    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Search => "Search",
            PanelKind::Shelf => "Bookshelf",
            PanelKind::CurrentBorrows => "Borrowed",
            PanelKind::History => "History",
            PanelKind::Recommendation => "Recommend",
            PanelKind::Reference => "Reference",
            PanelKind::Management => "Books",
            PanelKind::BorrowAdmin => "Borrows",
            PanelKind::Statistics => "Statistics",
            PanelKind::RecommendationAdmin => "Requests",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Column headers plus stringified cells, ready for a table widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableModel {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A modal notification waiting for the user to dismiss it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, error: &CommandError) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: error.to_string(),
        }
    }
}

/// What a panel needs to issue commands.
#[derive(Clone)]
pub struct PanelContext {
    pub dispatcher: Dispatcher<TabController>,
    pub role: Role,
    pub user_name: String,
}

/// A view composed into a tab.
pub trait Panel: Any {
    fn kind(&self) -> PanelKind;

    fn table(&self) -> TableModel;

    fn selection(&self) -> usize;

    fn select(&mut self, index: usize);

    /// Reload capability, if the panel has one.
    fn refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        None
    }

    fn load_state(&self) -> Option<ActivationState> {
        None
    }

    /// Make every outstanding command for this panel stale.
    fn dispose(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub struct TabController {
    role: Role,
    panels: Vec<Box<dyn Panel>>,
    active: usize,
    ctx: PanelContext,
    notices: VecDeque<Notice>,
}

impl TabController {
    /// Resolve the role and compose its panels. The set never changes afterwards.
    pub fn new(session: &Session, dispatcher: Dispatcher<TabController>) -> Self {
        let role = identity::resolve(&session.identity);
        info!(%role, user = %session.user_name, "Resolved session role");

        let panels = role.panels().iter().map(|kind| panels::build(*kind)).collect();

        Self {
            role,
            panels,
            active: 0,
            ctx: PanelContext {
                dispatcher,
                role,
                user_name: session.user_name.clone(),
            },
            notices: VecDeque::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn context(&self) -> &PanelContext {
        &self.ctx
    }

    pub fn kinds(&self) -> Vec<PanelKind> {
        self.panels.iter().map(|p| p.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_panel(&self) -> &dyn Panel {
        self.panels[self.active].as_ref()
    }

    pub fn active_panel_mut(&mut self) -> &mut dyn Panel {
        self.panels[self.active].as_mut()
    }

    /// Treat the initial tab as activated.
    pub fn start(&self) {
        self.schedule_refresh(self.active);
    }

    /// Switch tabs. The refresh for the newly active panel is posted to the UI
    /// context so it runs after the switch has been drawn. Selecting the tab
    /// that is already active is not an activation.
    pub fn activate(&mut self, index: usize) -> bool {
        if index >= self.panels.len() || index == self.active {
            return false;
        }
        self.active = index;
        info!(panel = %self.panels[index].kind(), "Tab activated");
        self.schedule_refresh(index);
        true
    }

    pub fn activate_next(&mut self) -> bool {
        let next = (self.active + 1) % self.panels.len();
        self.activate(next)
    }

    pub fn activate_prev(&mut self) -> bool {
        let prev = (self.active + self.panels.len() - 1) % self.panels.len();
        self.activate(prev)
    }

    /// Reload the active panel now (user-requested).
    pub fn refresh_active(&mut self) -> bool {
        self.refresh_at(self.active)
    }

    fn schedule_refresh(&self, index: usize) {
        self.ctx.dispatcher.ui().post(move |tabs: &mut TabController| {
            tabs.refresh_at(index);
        });
    }

    fn refresh_at(&mut self, index: usize) -> bool {
        let Some(panel) = self.panels.get_mut(index) else {
            return false;
        };
        let kind = panel.kind();
        match panel.refreshable() {
            Some(refreshable) => {
                let started = refreshable.refresh(&self.ctx);
                if !started {
                    debug!(panel = %kind, "Refresh already in flight, coalesced");
                }
                started
            }
            None => false,
        }
    }

    pub fn panel<P: Panel>(&self) -> Option<&P> {
        self.panels.iter().find_map(|p| p.as_any().downcast_ref::<P>())
    }

    pub fn panel_mut<P: Panel>(&mut self) -> Option<&mut P> {
        self.panels
            .iter_mut()
            .find_map(|p| p.as_any_mut().downcast_mut::<P>())
    }

    /// Run `f` against a panel of type `P` together with the command context.
    pub fn with_panel<P: Panel, R>(
        &mut self,
        f: impl FnOnce(&mut P, &PanelContext) -> R,
    ) -> Option<R> {
        let ctx = &self.ctx;
        self.panels
            .iter_mut()
            .find_map(|p| p.as_any_mut().downcast_mut::<P>())
            .map(|panel| f(panel, ctx))
    }

    /// Whether the panel of type `P` is the one in the foreground.
    pub fn is_active<P: Panel>(&self) -> bool {
        self.active_panel().as_any().is::<P>()
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Tear down: every in-flight outcome will be discarded on arrival.
    pub fn dispose(&mut self) {
        for panel in &mut self.panels {
            panel.dispose();
        }
        info!("Panels disposed");
    }
}
