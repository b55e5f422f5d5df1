//! Overlay instance state and view model computation.
//!
//! [`AppState`] is the single source of truth for one embedded overlay: the
//! resolved configuration, the host form snapshot, the pagination state, the
//! dialog state machine, the request sequence counters used for fencing, and the
//! last successfully rendered result page. The event handler mutates it; the
//! renderer reads the view model computed from it.
//!
//! # Fencing
//!
//! Every issued request gets the next sequence number. With fencing enabled only
//! the outcome of the most recently issued request is applied; closing the popup
//! forgets the latest sequence so nothing in flight can repaint it. With fencing
//! disabled outcomes are applied in arrival order, so a slow older request can
//! overwrite a newer one's results.

use crate::app::actions::Action;
use crate::app::dialog::{OverlayDialog, PanelChange};
use crate::app::modes::DialogState;
use crate::client::{build_request, SearchOutcome, SearchRequest};
use crate::domain::error::{PortalSearchError, Result};
use crate::domain::{HostForm, QueryState, Scope, SearchResponse};
use crate::ui::helpers::truncate_chars;
use crate::ui::viewmodel::{
    BodyView, Branding, ButtonPane, OverlayViewModel, PageLink, ResultItemView, SidePanelView, Summary,
};
use crate::Config;

/// Number of characters of the publication date that are displayed.
pub const DATE_DISPLAY_CHARS: usize = 16;

/// Number of page shortcuts listed in the side panel.
pub const SIDE_PANEL_PAGE_LINKS: u64 = 7;

/// A successfully normalized response together with the request it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage {
    pub seq: u64,
    /// Query state the request was issued with.
    pub query: QueryState,
    pub scope: Scope,
    /// `totalResults` with separators stripped.
    pub total: u64,
    pub response: SearchResponse,
}

/// State of one overlay instance.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub form: HostForm,
    pub query: QueryState,
    pub dialog: OverlayDialog,

    /// Last page that rendered successfully. Survives failed requests.
    pub results: Option<ResultPage>,

    /// User-facing message while the dialog is in `Error`.
    pub error: Option<String>,

    next_seq: u64,
    latest_seq: Option<u64>,
    last_request: Option<SearchRequest>,
}

impl AppState {
    /// Creates a closed overlay. The page size is read once from the host form's
    /// `maximumRecords` input.
    #[must_use]
    pub fn new(config: Config, form: HostForm) -> Self {
        let maximum_records = form.maximum_records().unwrap_or_else(|| {
            tracing::debug!("no usable maximumRecords field, using default page size");
            crate::domain::query::DEFAULT_MAXIMUM_RECORDS
        });

        let mut query = QueryState::new(maximum_records);
        query.query = form.query().to_string();

        Self {
            dialog: OverlayDialog::new(&config),
            config,
            form,
            query,
            results: None,
            error: None,
            next_seq: 1,
            latest_seq: None,
            last_request: None,
        }
    }

    /// Copies the host's current query text into the form and query state.
    pub fn sync_query(&mut self, query: &str) {
        self.form.set_query(query);
        self.query.query = query.to_string();
    }

    /// Sequence number of the most recently issued request still awaited.
    #[must_use]
    pub const fn latest_seq(&self) -> Option<u64> {
        self.latest_seq
    }

    /// Starts a search, or closes the popup when the query is empty.
    ///
    /// Opens the dialog if needed, shows the loading placeholder, and returns the
    /// request to issue.
    ///
    /// # Errors
    ///
    /// Propagates dialog transition errors.
    pub fn start_search(&mut self, requested: Scope) -> Result<Vec<Action>> {
        if self.query.is_query_empty() {
            tracing::debug!("empty query, closing instead of searching");
            return Ok(self.close());
        }

        self.enter_loading()?;

        let seq = self.take_seq();
        let request = build_request(&self.config, &self.form, &self.query, requested, seq);
        self.query.scope = request.scope;

        tracing::debug!(seq, query = %self.query.query, start_record = self.query.start_record, "search issued");

        self.latest_seq = Some(seq);
        self.last_request = Some(request.clone());

        Ok(vec![Action::FocusQueryField, Action::IssueRequest(request)])
    }

    /// Re-issues the last request under a new sequence number.
    ///
    /// Only acts in the `Error` state.
    ///
    /// # Errors
    ///
    /// Propagates dialog transition errors.
    pub fn retry(&mut self) -> Result<Vec<Action>> {
        if self.dialog.state() != DialogState::Error {
            tracing::debug!(state = ?self.dialog.state(), "retry ignored outside error state");
            return Ok(vec![]);
        }
        let Some(mut request) = self.last_request.clone() else {
            return Ok(vec![]);
        };

        self.enter_loading()?;

        let seq = self.take_seq();
        request.ticket.seq = seq;
        tracing::debug!(seq, "retrying last search");

        self.latest_seq = Some(seq);
        self.last_request = Some(request.clone());

        Ok(vec![Action::IssueRequest(request)])
    }

    /// Closes the popup, clears the query input, and destroys the side panel.
    ///
    /// Every in-flight request becomes stale.
    pub fn close(&mut self) -> Vec<Action> {
        let was_visible = self.dialog.state().is_visible();
        let change = self.dialog.close();

        self.latest_seq = None;
        self.error = None;

        if !was_visible {
            return vec![];
        }

        self.sync_query("");

        let mut actions = vec![Action::ClearQueryField];
        if change == PanelChange::Removed {
            actions.push(Action::RemoveSidePanel);
        }
        actions
    }

    /// Applies a worker outcome, subject to fencing.
    ///
    /// Returns whether the view changed and the actions to run.
    ///
    /// # Errors
    ///
    /// Propagates dialog transition errors.
    pub fn apply_outcome(&mut self, outcome: &SearchOutcome) -> Result<(bool, Vec<Action>)> {
        let seq = outcome.seq();

        if self.config.fence_responses && self.latest_seq != Some(seq) {
            tracing::debug!(seq, latest = ?self.latest_seq, "discarding stale search outcome");
            return Ok((false, vec![]));
        }

        let page = match outcome {
            SearchOutcome::Completed { ticket, scope, callback, body } => {
                Self::normalize(ticket.seq, &ticket.query, *scope, callback.as_deref(), body)
            }
            SearchOutcome::Failed { message, .. } => Err(PortalSearchError::Network(message.clone())),
            SearchOutcome::TimedOut { after_secs, .. } => Err(PortalSearchError::Timeout(*after_secs)),
        };

        match page {
            Ok(page) => self.show_results(page),
            Err(e) => self.show_error(seq, &e),
        }
    }

    fn normalize(
        seq: u64,
        query: &QueryState,
        scope: Scope,
        callback: Option<&str>,
        body: &str,
    ) -> Result<ResultPage> {
        let response = SearchResponse::from_body(body, callback)?;
        let total = response.total_count()?;
        Ok(ResultPage {
            seq,
            query: query.clone(),
            scope,
            total,
            response,
        })
    }

    fn show_results(&mut self, page: ResultPage) -> Result<(bool, Vec<Action>)> {
        tracing::debug!(seq = page.seq, total = page.total, items = page.response.items.len(), "rendering results");

        let links = page.response.items.iter().map(|item| item.link.clone()).collect();
        self.results = Some(page);
        self.error = None;

        // An unfenced stale failure can leave the dialog in Error while a newer
        // request is still outstanding.
        if self.dialog.state() == DialogState::Error {
            self.dialog.begin_loading()?;
        }

        let mut actions = vec![];
        if self.dialog.state() == DialogState::Loading {
            if let PanelChange::Mounted(geometry) = self.dialog.finish_loading()? {
                actions.push(Action::MountSidePanel(geometry));
            }
        }
        if self.dialog.state().is_visible() {
            actions.push(Action::DecorateFavicons {
                links,
                default_image: self.config.favicon_fallback(),
            });
        }

        Ok((true, actions))
    }

    fn show_error(&mut self, seq: u64, error: &PortalSearchError) -> Result<(bool, Vec<Action>)> {
        tracing::warn!(seq, error = %error, "search request failed");

        if self.dialog.state() != DialogState::Loading {
            return Ok((false, vec![]));
        }
        self.dialog.fail()?;
        self.error = Some(error.user_message());
        Ok((true, vec![]))
    }

    fn enter_loading(&mut self) -> Result<()> {
        match self.dialog.state() {
            DialogState::Closed => {
                self.dialog.open()?;
                self.dialog.begin_loading()
            }
            DialogState::Loading => Ok(()),
            DialogState::Opening | DialogState::Open | DialogState::Error => self.dialog.begin_loading(),
        }?;
        self.error = None;
        Ok(())
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Computes the renderable view of the overlay.
    #[must_use]
    pub fn compute_viewmodel(&self) -> OverlayViewModel {
        let items = self.compute_items();

        let body = match self.dialog.state() {
            DialogState::Opening | DialogState::Loading => BodyView::Loading {
                base_url: self.config.url.clone(),
                spinner: self.config.spinner_url(),
            },
            DialogState::Error => BodyView::Error {
                message: self.error.clone().unwrap_or_default(),
                retained: items,
            },
            DialogState::Open | DialogState::Closed if self.results.is_some() => BodyView::Results(items),
            DialogState::Open | DialogState::Closed => BodyView::Empty,
        };

        OverlayViewModel {
            state: self.dialog.state(),
            title: self.config.title.clone(),
            body,
            button_pane: self.compute_button_pane(),
            side_panel: self.compute_side_panel(),
        }
    }

    fn compute_items(&self) -> Vec<ResultItemView> {
        self.results.as_ref().map_or_else(Vec::new, |page| {
            page.response
                .items
                .iter()
                .map(|item| ResultItemView {
                    title: item.title.clone(),
                    link: item.link.clone(),
                    description: item.description.clone(),
                    date: truncate_chars(&item.pub_date, DATE_DISPLAY_CHARS),
                    size: item.sizename.clone(),
                })
                .collect()
        })
    }

    fn compute_button_pane(&self) -> Option<ButtonPane> {
        let page = self.results.as_ref()?;
        Some(ButtonPane {
            branding: Branding {
                link: self.config.link.clone(),
                logo: self.config.logo.clone(),
            },
            summary: Summary {
                start: page.query.display_start(),
                end: page.query.display_end(),
                total: page.total,
                scope: page.scope,
            },
        })
    }

    fn compute_side_panel(&self) -> Option<SidePanelView> {
        let panel = self.dialog.side_panel()?;
        Some(SidePanelView {
            title: panel.title.clone(),
            geometry: panel.geometry,
            visible: panel.visible,
            pages: self.compute_page_links(),
        })
    }

    /// Page shortcuts centered on the current page, at most
    /// [`SIDE_PANEL_PAGE_LINKS`] of them.
    fn compute_page_links(&self) -> Vec<PageLink> {
        let Some(page) = self.results.as_ref() else {
            return vec![];
        };

        let per_page = page.query.page_size();
        let total_pages = page.total.div_ceil(per_page).max(1);
        let current = page.query.current_page();

        let half = SIDE_PANEL_PAGE_LINKS / 2;
        let first = current
            .saturating_sub(half)
            .min(total_pages.saturating_sub(SIDE_PANEL_PAGE_LINKS - 1))
            .max(1);
        let last = first.saturating_add(SIDE_PANEL_PAGE_LINKS - 1).min(total_pages);

        (first..=last)
            .map(|number| PageLink {
                number,
                current: number == current,
            })
            .collect()
    }
}
