//! Editing session: the in-memory plan plus the interaction state around it.
//!
//! All mutations go through `Session`, which rebuilds derived state and
//! writes the whole plan to its store afterwards. Operations that reference
//! a task or segment that no longer exists are no-ops.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::error::PlanError;
use crate::io::PlanStore;
use crate::layout::{can_place_segment, compute_totals, DailyTotals};
use crate::model::{LabelSlot, Plan, Segment, Settings, Task, Timeline};

/// What clicks on the chart do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Create, select and edit segments.
    #[default]
    Plan,
    /// Mark completion on a chosen segment.
    Progress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRef {
    pub task_id: String,
    pub segment_id: String,
}

/// First click of the two-click creation gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStart {
    pub task_id: String,
    pub date: NaiveDate,
}

/// Result of a click on an empty chart cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A start date was recorded; the next click completes the segment.
    Pending(NaiveDate),
    Created { task_id: String, segment_id: String },
    ProgressMarked { segment_id: String },
    Ignored,
}

/// Edit applied to every selected segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentShift {
    /// Move the whole segment.
    Move(i64),
    /// Move the start of a range.
    Start(i64),
    /// Move the end of a range.
    End(i64),
}

pub struct Session {
    plan: Plan,
    timeline: Timeline,
    today: NaiveDate,
    mode: Mode,
    active_task: Option<String>,
    selected: Vec<SegmentRef>,
    progress_segment: Option<String>,
    pending: Option<PendingStart>,
    store: Box<dyn PlanStore>,
    last_save_error: Option<String>,
    /// Why the stored plan could not be restored at startup.
    restore_error: Option<String>,
    /// The store still holds an unreadable plan that has not been copied aside.
    unreadable_slot: bool,
    totals: DailyTotals,
}

impl Session {
    /// Restore the plan saved in `store`, or start a fresh one.
    ///
    /// An unreadable slot is left as it is: the fresh plan is only written
    /// on the first edit, after the old contents have been copied aside.
    pub fn open(store: Box<dyn PlanStore>, today: NaiveDate) -> Self {
        let loaded = match store.load() {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Saved plan could not be read, starting fresh: {}", e);
                let mut session = Self::with_plan(Plan::new_for(today), store, today);
                session.restore_error = Some(e.to_string());
                session.unreadable_slot = true;
                return session;
            }
        };
        match loaded {
            Some(plan) => {
                info!("Restored plan '{}' ({} tasks)", plan.project_name, plan.tasks.len());
                let mut session = Self::with_plan(plan, store, today);
                if session.plan.ensure_task() {
                    session.persist();
                }
                session
            }
            None => {
                let mut session = Self::with_plan(Plan::new_for(today), store, today);
                session.persist();
                session
            }
        }
    }

    /// Wrap an existing plan without touching the store.
    pub fn with_plan(plan: Plan, store: Box<dyn PlanStore>, today: NaiveDate) -> Self {
        let timeline = build_timeline(&plan.settings, today);
        let active_task = plan.tasks.last().map(|t| t.id.clone());
        let totals = compute_totals(&plan.tasks, &timeline);
        Self {
            plan,
            timeline,
            today,
            mode: Mode::Plan,
            active_task,
            selected: Vec::new(),
            progress_segment: None,
            pending: None,
            store,
            last_save_error: None,
            restore_error: None,
            unreadable_slot: false,
            totals,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn active_task(&self) -> Option<&str> {
        self.active_task.as_deref()
    }

    pub fn selected(&self) -> &[SegmentRef] {
        &self.selected
    }

    pub fn is_selected(&self, task_id: &str, segment_id: &str) -> bool {
        self.selected
            .iter()
            .any(|s| s.task_id == task_id && s.segment_id == segment_id)
    }

    pub fn progress_segment(&self) -> Option<&str> {
        self.progress_segment.as_deref()
    }

    pub fn pending(&self) -> Option<&PendingStart> {
        self.pending.as_ref()
    }

    pub fn store(&self) -> &dyn PlanStore {
        self.store.as_ref()
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn restore_error(&self) -> Option<&str> {
        self.restore_error.as_deref()
    }

    /// Per-day effort of the visible tasks, refreshed after every change.
    pub fn totals(&self) -> &DailyTotals {
        &self.totals
    }

    // ── Persistence ────────────────────────────────────────────────

    /// Write the whole plan. Failures are logged and remembered but never
    /// undo the in-memory change.
    fn persist(&mut self) {
        self.totals = compute_totals(&self.plan.tasks, &self.timeline);
        if self.unreadable_slot {
            match self.store.preserve_unreadable() {
                Ok(_) => self.unreadable_slot = false,
                Err(e) => {
                    warn!("Not saving over the unreadable plan: {}", e);
                    self.last_save_error = Some(e.to_string());
                    return;
                }
            }
        }
        match self.store.save(&self.plan) {
            Ok(()) => {
                debug!("Persisted plan '{}'", self.plan.project_name);
                self.last_save_error = None;
            }
            Err(e) => {
                warn!("Failed to save plan: {}", e);
                self.last_save_error = Some(e.to_string());
            }
        }
    }

    fn rebuild_timeline(&mut self) {
        self.timeline = build_timeline(&self.plan.settings, self.today);
        self.totals = compute_totals(&self.plan.tasks, &self.timeline);
        debug!("Timeline rebuilt: {}", self.timeline.range_label());
    }

    // ── Modes & selection ──────────────────────────────────────────

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.progress_segment = None;
        self.pending = None;
    }

    /// Make `task_id` the active row and drop any half-made segment.
    pub fn select_task(&mut self, task_id: &str) {
        if self.plan.task(task_id).is_none() {
            return;
        }
        self.active_task = Some(task_id.to_string());
        self.pending = None;
    }

    /// A click on a drawn segment: selects it in plan mode (shift toggles
    /// membership), picks it for progress marking in progress mode.
    pub fn click_segment(&mut self, task_id: &str, segment_id: &str, additive: bool) {
        match self.mode {
            Mode::Plan => self.select_segment(task_id, segment_id, additive),
            Mode::Progress => self.toggle_progress_segment(segment_id),
        }
    }

    pub fn select_segment(&mut self, task_id: &str, segment_id: &str, additive: bool) {
        let exists = self
            .plan
            .task(task_id)
            .is_some_and(|t| t.segment(segment_id).is_some());
        if !exists {
            return;
        }
        let target = SegmentRef {
            task_id: task_id.to_string(),
            segment_id: segment_id.to_string(),
        };
        if !additive {
            self.selected = vec![target];
        } else if let Some(pos) = self.selected.iter().position(|s| *s == target) {
            self.selected.remove(pos);
        } else {
            self.selected.push(target);
        }
        self.active_task = Some(task_id.to_string());
        self.pending = None;
    }

    /// Choose (or un-choose) the segment that progress clicks apply to.
    pub fn toggle_progress_segment(&mut self, segment_id: &str) {
        if self.progress_segment.as_deref() == Some(segment_id) {
            self.progress_segment = None;
        } else if self.plan.find_segment(segment_id).is_some() {
            self.progress_segment = Some(segment_id.to_string());
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    // ── Cell clicks ────────────────────────────────────────────────

    /// Handle a click on an empty cell of `task_id` at `date`.
    pub fn click_cell(&mut self, task_id: &str, date: NaiveDate) -> Result<ClickOutcome, PlanError> {
        match self.mode {
            Mode::Progress => self.mark_progress(date),
            Mode::Plan => self.plan_click(task_id, date),
        }
    }

    fn mark_progress(&mut self, date: NaiveDate) -> Result<ClickOutcome, PlanError> {
        let segment_id = self
            .progress_segment
            .clone()
            .ok_or(PlanError::NoProgressSegment)?;
        let Some(segment) = self.plan.find_segment_mut(&segment_id) else {
            self.progress_segment = None;
            return Ok(ClickOutcome::Ignored);
        };
        segment.mark_progress(date)?;
        self.persist();
        Ok(ClickOutcome::ProgressMarked { segment_id })
    }

    fn plan_click(&mut self, task_id: &str, date: NaiveDate) -> Result<ClickOutcome, PlanError> {
        if self.plan.task(task_id).is_none() {
            return Ok(ClickOutcome::Ignored);
        }
        if self.active_task.as_deref() != Some(task_id) {
            self.active_task = Some(task_id.to_string());
            self.pending = None;
        }
        let start = match self.pending.take() {
            Some(pending) if pending.task_id == task_id => pending.date,
            _ => {
                self.pending = Some(PendingStart {
                    task_id: task_id.to_string(),
                    date,
                });
                return Ok(ClickOutcome::Pending(date));
            }
        };
        match self.create_segment(task_id, start, date, "")? {
            Some(segment_id) => Ok(ClickOutcome::Created {
                task_id: task_id.to_string(),
                segment_id,
            }),
            None => Ok(ClickOutcome::Ignored),
        }
    }

    /// Add a segment over `[start, end]` after checking the overlap ceiling.
    /// The new segment becomes the selection.
    pub fn create_segment(
        &mut self,
        task_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        label: &str,
    ) -> Result<Option<String>, PlanError> {
        let Some(task) = self.plan.task_mut(task_id) else {
            return Ok(None);
        };
        can_place_segment(task, start, end)?;
        let segment = Segment::new(start, end, label.trim());
        let segment_id = segment.id.clone();
        debug!(
            "Created {:?} segment {} on {} ({} → {})",
            segment.kind, segment_id, task_id, segment.start_date, segment.end_date
        );
        task.segments.push(segment);
        self.selected = vec![SegmentRef {
            task_id: task_id.to_string(),
            segment_id: segment_id.clone(),
        }];
        self.persist();
        Ok(Some(segment_id))
    }

    // ── Task operations ────────────────────────────────────────────

    /// Append an empty task and make it active.
    pub fn add_task(&mut self) -> String {
        let task = Task::new();
        let id = task.id.clone();
        self.plan.tasks.push(task);
        self.active_task = Some(id.clone());
        self.pending = None;
        self.persist();
        id
    }

    pub fn delete_task(&mut self, task_id: &str) {
        let Some(index) = self.plan.task_index(task_id) else {
            return;
        };
        let task = self.plan.tasks.remove(index);
        self.selected.retain(|s| s.task_id != task_id);
        if self
            .progress_segment
            .as_deref()
            .is_some_and(|id| task.segment(id).is_some())
        {
            self.progress_segment = None;
        }
        if self.active_task.as_deref() == Some(task_id) {
            self.active_task = None;
        }
        if self.pending.as_ref().is_some_and(|p| p.task_id == task_id) {
            self.pending = None;
        }
        self.persist();
    }

    pub fn toggle_done(&mut self, task_id: &str) {
        if let Some(task) = self.plan.task_mut(task_id) {
            task.is_done = !task.is_done;
            self.persist();
        }
    }

    pub fn set_hidden(&mut self, task_id: &str, hidden: bool) {
        if let Some(task) = self.plan.task_mut(task_id) {
            if task.is_hidden != hidden {
                task.is_hidden = hidden;
                self.persist();
            }
        }
    }

    /// Move the task at `from` so it ends up at index `to`.
    pub fn move_task(&mut self, from: usize, to: usize) {
        let len = self.plan.tasks.len();
        if from == to || from >= len || to >= len {
            return;
        }
        let task = self.plan.tasks.remove(from);
        self.plan.tasks.insert(to, task);
        self.persist();
    }

    pub fn set_task_label(&mut self, task_id: &str, slot: LabelSlot, text: &str) {
        if let Some(task) = self.plan.task_mut(task_id) {
            if task.label(slot) != text {
                *task.label_mut(slot) = text.to_string();
                self.persist();
            }
        }
    }

    pub fn set_project_name(&mut self, name: &str) {
        if self.plan.project_name != name {
            self.plan.project_name = name.to_string();
            self.persist();
        }
    }

    pub fn set_memo(&mut self, memo: &str) {
        if self.plan.memo != memo {
            self.plan.memo = memo.to_string();
            self.persist();
        }
    }

    // ── Segment operations ─────────────────────────────────────────

    pub fn set_segment_label(&mut self, segment_id: &str, label: &str) {
        if let Some(segment) = self.plan.find_segment_mut(segment_id) {
            segment.label = label.trim().to_string();
            self.persist();
        }
    }

    pub fn delete_segment(&mut self, task_id: &str, segment_id: &str) {
        let removed = self
            .plan
            .task_mut(task_id)
            .is_some_and(|t| t.remove_segment(segment_id));
        if !removed {
            return;
        }
        self.selected
            .retain(|s| !(s.task_id == task_id && s.segment_id == segment_id));
        if self.progress_segment.as_deref() == Some(segment_id) {
            self.progress_segment = None;
        }
        self.persist();
    }

    /// Set or clear the effort of `segment_id` on `date` from user input.
    pub fn set_daily_value(
        &mut self,
        segment_id: &str,
        date: NaiveDate,
        input: &str,
    ) -> Result<(), PlanError> {
        let Some(segment) = self.plan.find_segment_mut(segment_id) else {
            return Ok(());
        };
        segment.set_daily_value(date, input)?;
        self.persist();
        Ok(())
    }

    /// Apply `shift` to every selected segment. Only available in plan
    /// mode; segments completed through their end are left alone. Returns
    /// how many segments changed.
    pub fn shift_selected(&mut self, shift: SegmentShift) -> usize {
        if self.mode != Mode::Plan || self.selected.is_empty() {
            return 0;
        }
        let mut changed = 0;
        for target in &self.selected {
            let Some(segment) = self
                .plan
                .task_mut(&target.task_id)
                .and_then(|t| t.segment_mut(&target.segment_id))
            else {
                continue;
            };
            if segment.is_completed() {
                continue;
            }
            let moved = match shift {
                SegmentShift::Move(days) => segment.move_by(days),
                SegmentShift::Start(days) => segment.move_start_by(days),
                SegmentShift::End(days) => segment.move_end_by(days),
            };
            if moved {
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist();
        }
        changed
    }

    /// Move every segment of the active task without recorded progress.
    pub fn shift_active_row(&mut self, days: i64) -> usize {
        let Some(task_id) = self.active_task.clone() else {
            return 0;
        };
        let Some(task) = self.plan.task_mut(&task_id) else {
            return 0;
        };
        let changed = task
            .segments
            .iter_mut()
            .map(|s| s.move_by(days))
            .filter(|moved| *moved)
            .count();
        if changed > 0 {
            self.persist();
        }
        changed
    }

    // ── Whole-plan operations ──────────────────────────────────────

    /// Change the calendar range and holidays. A range ending before it
    /// starts is rejected and nothing changes.
    pub fn apply_settings(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        holidays: BTreeSet<NaiveDate>,
    ) -> Result<(), PlanError> {
        self.plan.settings = Settings::new(start, end, holidays)?;
        self.rebuild_timeline();
        self.pending = None;
        self.persist();
        info!("Plan range set to {}", self.timeline.range_label());
        Ok(())
    }

    /// Start over with an empty plan that keeps the current calendar.
    pub fn clear_plan(&mut self) {
        let blank = Plan::blank(self.plan.settings.clone());
        self.install(blank);
        self.persist();
        info!("Started a blank plan");
    }

    /// Replace the whole plan, e.g. after an import. A plan that breaks the
    /// model rules is refused and the current one stays.
    pub fn replace_plan(&mut self, mut plan: Plan) -> Result<(), PlanError> {
        plan.validate()?;
        plan.ensure_task();
        info!("Replacing plan with '{}' ({} tasks)", plan.project_name, plan.tasks.len());
        self.install(plan);
        self.persist();
        Ok(())
    }

    fn install(&mut self, plan: Plan) {
        self.active_task = plan.tasks.last().map(|t| t.id.clone());
        self.plan = plan;
        self.selected.clear();
        self.progress_segment = None;
        self.pending = None;
        self.rebuild_timeline();
    }
}

fn build_timeline(settings: &Settings, today: NaiveDate) -> Timeline {
    Timeline::build(settings.start_date, settings.end_date, &settings.holidays, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStore;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn session() -> Session {
        let mut plan = Plan::new_for(d("2024-01-15"));
        plan.tasks[0].id = "t1".into();
        Session::with_plan(plan, Box::new(MemoryStore::new()), d("2024-01-15"))
    }

    fn saved(session: &Session) -> Plan {
        session.store().load().unwrap().expect("plan was saved")
    }

    #[test]
    fn two_clicks_create_a_range() {
        let mut s = session();
        assert_eq!(
            s.click_cell("t1", d("2024-01-10")).unwrap(),
            ClickOutcome::Pending(d("2024-01-10"))
        );
        let outcome = s.click_cell("t1", d("2024-01-05")).unwrap();
        let ClickOutcome::Created { segment_id, .. } = outcome else {
            panic!("expected a segment, got {:?}", outcome);
        };
        let task = s.plan().task("t1").unwrap();
        let segment = task.segment(&segment_id).unwrap();
        assert_eq!((segment.start_date, segment.end_date), (d("2024-01-05"), d("2024-01-10")));
        assert!(s.is_selected("t1", &segment_id));
        assert!(s.pending().is_none());
        assert_eq!(saved(&s).tasks[0].segments.len(), 1);
    }

    #[test]
    fn same_cell_twice_creates_a_point() {
        let mut s = session();
        s.click_cell("t1", d("2024-01-10")).unwrap();
        s.click_cell("t1", d("2024-01-10")).unwrap();
        assert!(s.plan().tasks[0].segments[0].is_point());
    }

    #[test]
    fn clicking_another_task_restarts_the_gesture() {
        let mut s = session();
        let other = s.add_task();
        s.click_cell("t1", d("2024-01-10")).unwrap();
        assert_eq!(
            s.click_cell(&other, d("2024-01-12")).unwrap(),
            ClickOutcome::Pending(d("2024-01-12"))
        );
        assert_eq!(s.active_task(), Some(other.as_str()));
        assert!(s.plan().tasks.iter().all(|t| t.segments.is_empty()));
    }

    #[test]
    fn fourth_overlap_is_rejected_and_gesture_cancelled() {
        let mut s = session();
        for _ in 0..3 {
            s.create_segment("t1", d("2024-02-01"), d("2024-02-01"), "").unwrap();
        }
        s.click_cell("t1", d("2024-01-30")).unwrap();
        let err = s.click_cell("t1", d("2024-02-02")).unwrap_err();
        assert!(matches!(err, PlanError::OverlapLimit { .. }));
        assert_eq!(s.plan().tasks[0].segments.len(), 3);
        assert!(s.pending().is_none());
    }

    #[test]
    fn progress_mode_marks_the_chosen_segment() {
        let mut s = session();
        let id = s
            .create_segment("t1", d("2024-01-02"), d("2024-01-06"), "pour")
            .unwrap()
            .unwrap();
        s.set_mode(Mode::Progress);
        assert_eq!(
            s.click_cell("t1", d("2024-01-03")),
            Err(PlanError::NoProgressSegment)
        );

        s.click_segment("t1", &id, false);
        assert_eq!(s.progress_segment(), Some(id.as_str()));
        s.click_cell("t1", d("2024-01-04")).unwrap();
        assert_eq!(
            saved(&s).tasks[0].segments[0].progress_end_date,
            Some(d("2024-01-04"))
        );
        assert!(matches!(
            s.click_cell("t1", d("2024-01-20")),
            Err(PlanError::OutsideSegment { .. })
        ));

        s.set_mode(Mode::Plan);
        assert_eq!(s.progress_segment(), None);
    }

    #[test]
    fn shifting_respects_progress_and_mode() {
        let mut s = session();
        let free = s
            .create_segment("t1", d("2024-01-02"), d("2024-01-04"), "")
            .unwrap()
            .unwrap();
        let started = s
            .create_segment("t1", d("2024-01-10"), d("2024-01-12"), "")
            .unwrap()
            .unwrap();
        s.plan.find_segment_mut(&started).unwrap().progress_end_date = Some(d("2024-01-11"));
        s.select_segment("t1", &free, false);
        s.select_segment("t1", &started, true);

        assert_eq!(s.shift_selected(SegmentShift::Move(7)), 1);
        assert_eq!(s.plan().find_segment(&free).unwrap().1.start_date, d("2024-01-09"));
        assert_eq!(s.shift_selected(SegmentShift::End(-1)), 2);
        assert_eq!(s.plan().find_segment(&started).unwrap().1.end_date, d("2024-01-11"));
        // Completed through its end now: frozen.
        assert_eq!(s.shift_selected(SegmentShift::End(1)), 1);

        s.set_mode(Mode::Progress);
        assert_eq!(s.shift_selected(SegmentShift::Move(1)), 0);
    }

    #[test]
    fn row_shift_moves_only_unstarted_segments() {
        let mut s = session();
        s.create_segment("t1", d("2024-01-02"), d("2024-01-04"), "").unwrap();
        let started = s
            .create_segment("t1", d("2024-01-10"), d("2024-01-12"), "")
            .unwrap()
            .unwrap();
        s.plan.find_segment_mut(&started).unwrap().progress_end_date = Some(d("2024-01-10"));
        s.select_task("t1");
        assert_eq!(s.shift_active_row(1), 1);
        assert_eq!(s.plan().tasks[0].segments[0].start_date, d("2024-01-03"));
    }

    #[test]
    fn invalid_settings_leave_the_plan_untouched() {
        let mut s = session();
        let before = s.plan().settings.clone();
        let err = s
            .apply_settings(d("2024-03-01"), d("2024-02-01"), BTreeSet::new())
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidRange { .. }));
        assert_eq!(s.plan().settings, before);

        let holidays: BTreeSet<_> = [d("2024-03-04")].into_iter().collect();
        s.apply_settings(d("2024-03-01"), d("2024-03-10"), holidays).unwrap();
        assert_eq!(s.timeline().len(), 10);
        assert!(s.timeline().days()[3].is_holiday);
    }

    #[test]
    fn deleting_cleans_up_selection() {
        let mut s = session();
        let id = s
            .create_segment("t1", d("2024-01-02"), d("2024-01-04"), "")
            .unwrap()
            .unwrap();
        s.toggle_progress_segment(&id);
        s.delete_segment("t1", &id);
        assert!(s.selected().is_empty());
        assert_eq!(s.progress_segment(), None);
        assert!(s.plan().tasks[0].segments.is_empty());

        s.delete_task("missing");
        s.delete_task("t1");
        assert!(s.plan().tasks.is_empty());
        assert_eq!(s.active_task(), None);
    }

    #[test]
    fn reorder_hide_and_totals() {
        let mut s = session();
        let second = s.add_task();
        s.create_segment(&second, d("2024-01-05"), d("2024-01-05"), "").unwrap();
        let seg = s.plan().task(&second).unwrap().segments[0].id.clone();
        s.set_daily_value(&seg, d("2024-01-05"), "2.5").unwrap();
        assert_eq!(s.totals().get(d("2024-01-05")), 2.5);

        s.set_hidden(&second, true);
        assert_eq!(s.totals().get(d("2024-01-05")), 0.0);

        s.move_task(1, 0);
        assert_eq!(s.plan().tasks[0].id, second);
        assert_eq!(saved(&s).tasks[0].id, second);
    }

    #[test]
    fn clear_and_replace() {
        let mut s = session();
        s.set_project_name("Roadworks");
        s.set_task_label("t1", LabelSlot::Second, "crew B");
        assert_eq!(saved(&s).tasks[0].label2, "crew B");

        let settings = s.plan().settings.clone();
        s.clear_plan();
        assert_eq!(s.plan().project_name, "New Plan");
        assert_eq!(s.plan().settings, settings);
        assert_eq!(s.plan().tasks.len(), 1);

        let mut imported = Plan::new_for(d("2024-06-01"));
        imported.tasks.clear();
        imported.project_name = "Imported".into();
        s.replace_plan(imported).unwrap();
        assert_eq!(saved(&s).project_name, "Imported");
        assert_eq!(s.plan().tasks.len(), 1);
        assert_eq!(s.timeline().days()[0].date, d("2024-06-01"));
    }

    #[test]
    fn replace_refuses_inconsistent_plans() {
        let mut s = session();
        s.set_project_name("Current");
        let before = s.plan().clone();

        let mut reversed = Plan::new_for(d("2024-06-01"));
        reversed.settings.end_date = d("2024-05-01");
        assert!(matches!(
            s.replace_plan(reversed),
            Err(PlanError::InvalidRange { .. })
        ));

        let mut bad_segment = Plan::new_for(d("2024-06-01"));
        let mut segment = Segment::new(d("2024-06-10"), d("2024-06-10"), "");
        segment.end_date = d("2024-06-02");
        bad_segment.tasks[0].segments.push(segment);
        assert!(matches!(
            s.replace_plan(bad_segment),
            Err(PlanError::MalformedSegment { .. })
        ));

        assert_eq!(s.plan(), &before);
        assert_eq!(saved(&s), before);
        assert!(!s.timeline().is_empty());
    }

    #[test]
    fn open_starts_fresh_and_then_restores() {
        let store = MemoryStore::new();
        let mut first = Session::open(Box::new(store), d("2024-01-15"));
        assert_eq!(first.plan().tasks.len(), 1);
        first.set_memo("remember the permits");
        let snapshot = saved(&first);

        let mut store = MemoryStore::new();
        store.save(&snapshot).unwrap();
        let restored = Session::open(Box::new(store), d("2024-01-15"));
        assert_eq!(restored.plan(), &snapshot);
    }
}
