/*
[INPUT]:  User actions (login, tab switch, expand, start, complete, delegate, logout)
[OUTPUT]: Sequenced API calls merged into ViewState, with user-facing notices
[POS]:    Orchestration layer - the view-state orchestrator
[UPDATE]: When adding user actions or changing refresh policies
*/

pub mod action;
pub mod state;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};
use wfe_mobile_adapter::{
    AuthManager, AuthenticatedClient, Executor, Session, TaskVariables, WfeClient,
};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::statistics::Statistics;

use self::action::{Action, InFlight};
use self::state::{Notice, Tab, TaskForm, ViewState};

const MSG_INVALID_CREDENTIALS: &str = "Invalid login or password";
const MSG_PROCESSES_FAILED: &str = "Failed to load processes";
const MSG_TASKS_FAILED: &str = "Failed to load tasks";
const MSG_START_FAILED: &str = "Failed to start process";
const MSG_COMPLETE_FAILED: &str = "Failed to complete task";
const MSG_COMPLETED: &str = "Task completed";
const MSG_FORM_FAILED: &str = "Failed to load task variables";
const MSG_DELEGATE_FAILED: &str = "Failed to delegate task";
const MSG_DELEGATED: &str = "Task delegated";
const MSG_EXECUTORS_FAILED: &str = "Failed to find executors";
const MSG_STATISTICS_FAILED: &str = "Failed to load statistics";
const MSG_PROFILE_FAILED: &str = "Failed to load user profile";
const MSG_PROFILE_NOT_FOUND: &str = "Profile not found";

/// Coordinates API calls for one user session and owns the derived view state.
///
/// All methods take `&self`; share it behind an `Arc` to drive it from
/// concurrently spawned UI actions. The state lock is never held across an
/// await.
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    auth: AuthManager,
    state: RwLock<ViewState>,
    in_flight: InFlight,
}

impl App {
    /// Build the HTTP client from configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let client = WfeClient::with_config_and_base_url(
            config.server.client_config(),
            &config.server.base_url,
        )?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: AppConfig, client: WfeClient) -> Self {
        Self {
            config,
            auth: AuthManager::new(client),
            state: RwLock::new(ViewState::default()),
            in_flight: InFlight::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> Option<Session> {
        self.auth.session()
    }

    /// Copy of the current view state for rendering
    pub fn snapshot(&self) -> ViewState {
        self.read().clone()
    }

    pub fn is_in_flight(&self, action: Action) -> bool {
        self.in_flight.contains(action)
    }

    // ---- session ----------------------------------------------------------

    /// Authenticate, then fetch every tracked process once.
    ///
    /// A failed process fetch does not fail the login; it leaves a notice.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Session> {
        let _guard = self.in_flight.begin(Action::Login)?;
        let started = {
            let mut state = self.write();
            state.loading.login = true;
            state.session_epoch
        };

        let session = match self.auth.authenticate(identifier, secret).await {
            Ok(session) => session,
            Err(err) => {
                self.update_if_current(started, |state| {
                    state.loading.login = false;
                    state.notice = Some(Notice::error(MSG_INVALID_CREDENTIALS));
                });
                return Err(err.into());
            }
        };

        // Checked and stored under the state lock, which logout also holds
        let epoch = {
            let mut state = self.write();
            if state.session_epoch != started {
                debug!("session changed during login, discarding the new session");
                return Err(AppError::SessionChanged);
            }
            let epoch = started + 1;
            self.auth.sessions().set(session.clone());
            *state = ViewState::for_session(
                session.display_name.clone(),
                &self.config.tracked_processes,
                epoch,
            );
            epoch
        };

        let client = self.auth.client().authenticated(session.token.clone());
        if let Err(err) = self.fetch_processes(&client, epoch).await {
            self.fail(epoch, MSG_PROCESSES_FAILED, err);
        }
        Ok(session)
    }

    /// Drop the session and every derived collection. The server is not notified.
    pub fn logout(&self) {
        let mut state = self.write();
        let epoch = state.session_epoch + 1;
        self.auth.logout();
        self.in_flight.clear();
        *state = ViewState {
            session_epoch: epoch,
            ..ViewState::default()
        };
    }

    // ---- processes --------------------------------------------------------

    /// Re-fetch every tracked process
    pub async fn refresh_processes(&self) -> Result<()> {
        let client = self.client()?;
        let _guard = self.in_flight.begin(Action::RefreshProcesses)?;
        let epoch = self.epoch();
        self.fetch_processes(&client, epoch)
            .await
            .map_err(|err| self.fail(epoch, MSG_PROCESSES_FAILED, err))
    }

    /// Switch the visible list. Active/ended filtering is client-side and
    /// never re-fetches; "my tasks" is fetched the first time it is shown.
    pub async fn select_tab(&self, tab: Tab) -> Result<()> {
        let needs_fetch = {
            let mut state = self.write();
            state.active_tab = tab;
            tab == Tab::MyTasks && !state.my_tasks_loaded
        };
        if needs_fetch {
            self.refresh_my_tasks().await?;
        }
        Ok(())
    }

    /// Start a process, then re-fetch the tracked processes
    pub async fn start_process(&self, process_id: i64) -> Result<()> {
        let client = self.client()?;
        self.ensure_tracked(process_id)?;
        let _guard = self.in_flight.begin(Action::StartProcess(process_id))?;
        let epoch = self.epoch();

        self.update_process(epoch, process_id, |p| p.starting = true);
        let started = client.start_process(process_id).await;
        self.update_process(epoch, process_id, |p| p.starting = false);

        if let Err(err) = started {
            return Err(self.fail(epoch, MSG_START_FAILED, err));
        }

        self.fetch_processes(&client, epoch)
            .await
            .map_err(|err| self.fail(epoch, MSG_PROCESSES_FAILED, err))
    }

    // ---- task lists -------------------------------------------------------

    /// Expand or collapse a process's task list. Collapsing keeps the tasks.
    pub async fn toggle_tasks(&self, process_id: i64) -> Result<()> {
        let expanded = {
            let mut state = self.write();
            let process = state
                .process_mut(process_id)
                .ok_or(AppError::UnknownProcess(process_id))?;
            process.expanded = !process.expanded;
            process.expanded
        };
        if expanded {
            self.ensure_tasks_loaded(process_id).await?;
        }
        Ok(())
    }

    /// Fetch the task sublist unless it is already loaded or loading
    pub async fn ensure_tasks_loaded(&self, process_id: i64) -> Result<()> {
        let client = self.client()?;
        let loaded = self
            .read()
            .process(process_id)
            .map(|p| p.tasks_loaded)
            .ok_or(AppError::UnknownProcess(process_id))?;
        if loaded {
            debug!(process_id, "tasks already loaded");
            return Ok(());
        }

        let Ok(_guard) = self.in_flight.begin(Action::LoadTasks(process_id)) else {
            debug!(process_id, "tasks already loading");
            return Ok(());
        };
        let epoch = self.epoch();
        self.reload_tasks(&client, epoch, process_id)
            .await
            .map_err(|err| self.fail(epoch, MSG_TASKS_FAILED, err))
    }

    /// Re-fetch the current user's tasks
    pub async fn refresh_my_tasks(&self) -> Result<()> {
        let client = self.client()?;
        let _guard = self.in_flight.begin(Action::RefreshMyTasks)?;
        let epoch = self.epoch();
        self.fetch_my_tasks(&client, epoch)
            .await
            .map_err(|err| self.fail(epoch, MSG_TASKS_FAILED, err))
    }

    // ---- completion -------------------------------------------------------

    /// Complete a task of a tracked process.
    ///
    /// Sequence: completion, then the process detail, then its task list.
    /// A failed completion skips both re-fetches. Re-fetch failures are only
    /// logged; the completion still counts as successful.
    pub async fn complete_task(
        &self,
        process_id: i64,
        task_id: i64,
        variables: Option<TaskVariables>,
    ) -> Result<()> {
        let client = self.client()?;
        self.ensure_tracked(process_id)?;
        let _guard = self.in_flight.begin(Action::CompleteTask(task_id))?;
        let epoch = self.epoch();

        self.submit_completion(&client, epoch, task_id, variables)
            .await?;

        if let Err(err) = self.refetch_process(&client, epoch, process_id).await {
            warn!(process_id, error = %err, "process refresh after completion failed");
        }
        if let Err(err) = self.reload_tasks(&client, epoch, process_id).await {
            warn!(process_id, error = %err, "task refresh after completion failed");
        }
        Ok(())
    }

    /// Complete a task from the "my tasks" list, then re-fetch that list
    pub async fn complete_my_task(
        &self,
        task_id: i64,
        variables: Option<TaskVariables>,
    ) -> Result<()> {
        let client = self.client()?;
        let _guard = self.in_flight.begin(Action::CompleteTask(task_id))?;
        let epoch = self.epoch();

        self.submit_completion(&client, epoch, task_id, variables)
            .await?;

        if let Err(err) = self.fetch_my_tasks(&client, epoch).await {
            warn!(task_id, error = %err, "my tasks refresh after completion failed");
        }
        Ok(())
    }

    // ---- task form --------------------------------------------------------

    /// Fetch the task's variables and open a form with empty values
    pub async fn open_task_form(&self, process_id: Option<i64>, task_id: i64) -> Result<()> {
        let client = self.client()?;
        if let Some(process_id) = process_id {
            self.ensure_tracked(process_id)?;
        }
        let _guard = self.in_flight.begin(Action::OpenTaskForm(task_id))?;
        let epoch = self.epoch();

        self.update_if_current(epoch, |s| s.loading.task_form = true);
        let detail = client.get_task_variables(task_id).await;
        self.update_if_current(epoch, |s| s.loading.task_form = false);

        let detail = detail.map_err(|err| self.fail(epoch, MSG_FORM_FAILED, err))?;
        self.update_if_current(epoch, |s| {
            s.task_form = Some(TaskForm::new(task_id, process_id, &detail.variables));
        });
        Ok(())
    }

    pub fn set_form_value(&self, name: &str, value: impl Into<String>) -> Result<()> {
        let mut state = self.write();
        let form = state
            .task_form
            .as_mut()
            .ok_or_else(|| AppError::TaskForm("no task form is open".to_string()))?;
        if form.set(name, value) {
            Ok(())
        } else {
            Err(AppError::TaskForm(format!("task has no variable named {name}")))
        }
    }

    /// Complete the task with the form values; the form closes on success
    pub async fn submit_task_form(&self) -> Result<()> {
        let form = self
            .read()
            .task_form
            .clone()
            .ok_or_else(|| AppError::TaskForm("no task form is open".to_string()))?;
        let values = Some(form.values());

        match form.process_id {
            Some(process_id) => self.complete_task(process_id, form.task_id, values).await?,
            None => self.complete_my_task(form.task_id, values).await?,
        }

        let mut state = self.write();
        if state.task_form.as_ref().map(|f| f.task_id) == Some(form.task_id) {
            state.task_form = None;
        }
        Ok(())
    }

    pub fn cancel_task_form(&self) {
        self.write().task_form = None;
    }

    // ---- delegation and executors -----------------------------------------

    pub async fn delegate_task(
        &self,
        task_id: i64,
        current_owner_name: &str,
        keep_current_owner: bool,
        new_assignees: &[Executor],
    ) -> Result<()> {
        let client = self.client()?;
        let _guard = self.in_flight.begin(Action::DelegateTask(task_id))?;
        let epoch = self.epoch();

        self.update_if_current(epoch, |s| {
            s.loading.submitting_tasks.insert(task_id);
        });
        let result = client
            .delegate_task(task_id, current_owner_name, keep_current_owner, new_assignees)
            .await;
        self.update_if_current(epoch, |s| {
            s.loading.submitting_tasks.remove(&task_id);
        });

        result.map_err(|err| self.fail(epoch, MSG_DELEGATE_FAILED, err))?;
        self.notify(epoch, Notice::info(MSG_DELEGATED));
        Ok(())
    }

    /// Executors whose name matches; no match is an empty list
    pub async fn lookup_executors(&self, name: &str) -> Result<Vec<Executor>> {
        let client = self.client()?;
        let epoch = self.epoch();
        client
            .lookup_executor_by_name(name)
            .await
            .map_err(|err| self.fail(epoch, MSG_EXECUTORS_FAILED, err))
    }

    /// Look the logged-in user up as an executor; first match wins
    pub async fn load_profile(&self) -> Result<Option<Executor>> {
        let client = self.client()?;
        let display_name = self
            .read()
            .display_name
            .clone()
            .ok_or(AppError::NotLoggedIn)?;
        let _guard = self.in_flight.begin(Action::LoadProfile)?;
        let epoch = self.epoch();

        self.update_if_current(epoch, |s| s.loading.profile = true);
        let found = client.lookup_executor_by_name(&display_name).await;
        self.update_if_current(epoch, |s| s.loading.profile = false);

        let profile = found
            .map_err(|err| self.fail(epoch, MSG_PROFILE_FAILED, err))?
            .into_iter()
            .next();
        self.update_if_current(epoch, |s| {
            s.profile = profile.clone();
            if profile.is_none() {
                s.notice = Some(Notice::info(MSG_PROFILE_NOT_FOUND));
            }
        });
        Ok(profile)
    }

    // ---- statistics -------------------------------------------------------

    pub async fn load_statistics(&self) -> Result<Statistics> {
        let client = self.client()?;
        let _guard = self.in_flight.begin(Action::LoadStatistics)?;
        let epoch = self.epoch();

        self.update_if_current(epoch, |s| s.loading.statistics = true);
        let fetched = Statistics::fetch(&client, self.config.my_tasks).await;
        self.update_if_current(epoch, |s| s.loading.statistics = false);

        let stats = fetched.map_err(|err| self.fail(epoch, MSG_STATISTICS_FAILED, err))?;
        self.update_if_current(epoch, |s| s.statistics = Some(stats));
        Ok(stats)
    }

    // ---- internals --------------------------------------------------------

    fn read(&self) -> RwLockReadGuard<'_, ViewState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn epoch(&self) -> u64 {
        self.read().session_epoch
    }

    fn client(&self) -> Result<AuthenticatedClient> {
        self.auth.authenticated_client().ok_or(AppError::NotLoggedIn)
    }

    fn ensure_tracked(&self, process_id: i64) -> Result<()> {
        if self.read().process(process_id).is_some() {
            Ok(())
        } else {
            Err(AppError::UnknownProcess(process_id))
        }
    }

    /// Apply `f` unless the session changed since `epoch` was taken
    fn update_if_current(&self, epoch: u64, f: impl FnOnce(&mut ViewState)) -> bool {
        let mut state = self.write();
        if state.session_epoch != epoch {
            debug!("dropping update from a previous session");
            return false;
        }
        f(&mut state);
        true
    }

    fn update_process(
        &self,
        epoch: u64,
        process_id: i64,
        f: impl FnOnce(&mut state::TrackedProcess),
    ) {
        self.update_if_current(epoch, |s| {
            if let Some(process) = s.process_mut(process_id) {
                f(process);
            }
        });
    }

    fn notify(&self, epoch: u64, notice: Notice) {
        self.update_if_current(epoch, |s| s.notice = Some(notice));
    }

    /// Record a user-facing error notice and hand the error back
    fn fail(&self, epoch: u64, message: &str, err: impl Into<AppError>) -> AppError {
        let err = err.into();
        warn!(error = %err, "{message}");
        self.notify(epoch, Notice::error(message));
        err
    }

    async fn fetch_processes(&self, client: &AuthenticatedClient, epoch: u64) -> Result<()> {
        let ids = self.config.tracked_ids();
        self.update_if_current(epoch, |s| s.loading.processes = true);
        let fetched = client.list_tracked_processes(&ids).await;
        self.update_if_current(epoch, |s| s.loading.processes = false);

        let fetched = fetched?;
        self.update_if_current(epoch, |s| {
            for (process, data) in s.processes.iter_mut().zip(fetched) {
                process.data = Some(data);
            }
        });
        info!(count = ids.len(), "tracked processes refreshed");
        Ok(())
    }

    async fn refetch_process(
        &self,
        client: &AuthenticatedClient,
        epoch: u64,
        process_id: i64,
    ) -> Result<()> {
        let data = client.get_process(process_id).await?;
        self.update_process(epoch, process_id, |p| p.data = Some(data));
        Ok(())
    }

    async fn reload_tasks(
        &self,
        client: &AuthenticatedClient,
        epoch: u64,
        process_id: i64,
    ) -> Result<()> {
        self.update_process(epoch, process_id, |p| p.loading_tasks = true);
        let fetched = client.list_tasks_for_process(process_id).await;
        self.update_process(epoch, process_id, |p| p.loading_tasks = false);

        let tasks = fetched?;
        debug!(process_id, count = tasks.len(), "tasks loaded");
        self.update_process(epoch, process_id, |p| {
            p.tasks = tasks;
            p.tasks_loaded = true;
        });
        Ok(())
    }

    async fn fetch_my_tasks(&self, client: &AuthenticatedClient, epoch: u64) -> Result<()> {
        let paging = self.config.my_tasks;
        self.update_if_current(epoch, |s| s.loading.my_tasks = true);
        let fetched = client.list_my_tasks(paging.page, paging.page_size).await;
        self.update_if_current(epoch, |s| s.loading.my_tasks = false);

        let tasks = fetched?;
        self.update_if_current(epoch, |s| {
            s.my_tasks = tasks;
            s.my_tasks_loaded = true;
        });
        Ok(())
    }

    async fn submit_completion(
        &self,
        client: &AuthenticatedClient,
        epoch: u64,
        task_id: i64,
        variables: Option<TaskVariables>,
    ) -> Result<()> {
        self.update_if_current(epoch, |s| {
            s.loading.submitting_tasks.insert(task_id);
        });
        let result = client.complete_task(task_id, variables).await;
        self.update_if_current(epoch, |s| {
            s.loading.submitting_tasks.remove(&task_id);
        });

        match result {
            Ok(()) => {
                self.notify(epoch, Notice::info(MSG_COMPLETED));
                Ok(())
            }
            Err(err) => Err(self.fail(epoch, MSG_COMPLETE_FAILED, err)),
        }
    }
}
