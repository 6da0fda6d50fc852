//! Mail pool: ordered pending mail, the waiting-robot queue, and the per-tick
//! loader that matches mail to robots by capability.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::audit::{build_audit_event, AuditSink};
use crate::core::mail::{IntakeRules, ItemDescriptor, Mail};
use crate::core::ordering::insert_ordered;
use crate::core::robot::{Robot, RobotHandle, RobotId};
use crate::core::tube::TubeError;
use crate::core::PoolError;

/// Entry in the waiting queue. Id and strength are captured at registration
/// so the queue can be maintained without locking robots.
struct WaitingRobot<R> {
    id: RobotId,
    strong: bool,
    handle: RobotHandle<R>,
}

/// Keys of an item committed to a tube, with its mail id.
type Committed = (ItemDescriptor<()>, String);

/// Outcome of one scheduling tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Robots released this tick, in the order they were loaded.
    pub dispatched: Vec<RobotId>,
    /// Items committed to tubes this tick.
    pub loaded: usize,
    /// Per-item commit failures that were recovered by requeueing the item.
    pub failures: Vec<PoolError>,
}

/// Pool of undelivered mail and the robots waiting to be loaded.
///
/// `pending` is always sorted by [`dispatch_order`](crate::core::dispatch_order)
/// and `light_count` always equals the number of non-heavy items in it.
/// Every mutating operation takes `&mut self`; wrap the pool in
/// [`SharedMailPool`] to drive it from several threads.
pub struct MailPool<M, R> {
    rules: IntakeRules,
    pending: Vec<ItemDescriptor<M>>,
    light_count: usize,
    waiting: Vec<WaitingRobot<R>>,
    next_seq: u64,
    audit: Option<Box<dyn AuditSink>>,
}

impl<M, R> Default for MailPool<M, R>
where
    M: Mail,
    R: Robot<M>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M, R> MailPool<M, R>
where
    M: Mail,
    R: Robot<M>,
{
    /// Create an empty pool using the default intake rules.
    pub fn new() -> Self {
        Self::with_rules(IntakeRules::default())
    }

    /// Create an empty pool using custom intake rules.
    pub fn with_rules(rules: IntakeRules) -> Self {
        Self {
            rules,
            pending: Vec::new(),
            light_count: 0,
            waiting: Vec::new(),
            next_seq: 0,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Intake rules applied by [`add_item`](Self::add_item).
    pub const fn rules(&self) -> IntakeRules {
        self.rules
    }

    /// Pending items in dispatch order.
    pub fn pending(&self) -> &[ItemDescriptor<M>] {
        &self.pending
    }

    /// Number of pending items.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no mail is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending items that are not heavy.
    pub const fn light_count(&self) -> usize {
        self.light_count
    }

    /// Ids of waiting robots in the order they will be served.
    pub fn waiting_ids(&self) -> Vec<RobotId> {
        self.waiting.iter().map(|w| w.id).collect()
    }

    /// Whether the robot is currently waiting for mail.
    pub fn is_waiting(&self, id: RobotId) -> bool {
        self.waiting.iter().any(|w| w.id == id)
    }

    /// Take a mail item into the pool.
    pub fn add_item(&mut self, mail: M) {
        let mut descriptor = ItemDescriptor::with_rules(mail, &self.rules);
        descriptor.seq = self.next_seq;
        self.next_seq += 1;
        tracing::debug!(
            mail = descriptor.mail.id(),
            priority = descriptor.priority,
            floor = descriptor.destination,
            heavy = descriptor.heavy,
            fragile = descriptor.fragile,
            "mail added to pool"
        );
        if let Some(sink) = self.audit.as_mut() {
            sink.record(build_audit_event(descriptor.mail.id(), None, "intake", None));
        }
        self.insert(descriptor);
    }

    /// Queue a robot for loading.
    ///
    /// Strong robots go behind the strong robots already waiting and ahead of
    /// every non-strong robot; non-strong robots go to the back. A robot that
    /// is already waiting keeps its place.
    pub fn register_waiting(&mut self, handle: RobotHandle<R>) {
        let (id, strong) = {
            let robot = handle.lock();
            (robot.id(), robot.capabilities().strong)
        };
        if self.is_waiting(id) {
            tracing::debug!("robot {} already waiting", id);
            return;
        }

        let at = if strong {
            self.waiting
                .iter()
                .position(|w| !w.strong)
                .unwrap_or(self.waiting.len())
        } else {
            self.waiting.len()
        };
        self.waiting.insert(at, WaitingRobot { id, strong, handle });
        tracing::debug!("robot {} waiting at position {}", id, at);
    }

    /// Remove a robot from the waiting queue. Returns whether it was waiting.
    pub fn deregister_waiting(&mut self, id: RobotId) -> bool {
        match self.waiting.iter().position(|w| w.id == id) {
            Some(at) => {
                self.waiting.remove(at);
                true
            }
            None => false,
        }
    }

    /// Run one scheduling tick over the robots waiting at tick start.
    ///
    /// Tube-full rejections are recovered and listed in the report. A broken
    /// fragile item aborts the tick with [`PoolError::FragileItemBroken`]
    /// after the robot's partial load and the remaining staged mail have been
    /// returned to the pool. That robot keeps waiting with an empty tube.
    pub fn step(&mut self) -> Result<TickReport, PoolError> {
        let snapshot: Vec<(RobotId, RobotHandle<R>)> = self
            .waiting
            .iter()
            .map(|w| (w.id, Arc::clone(&w.handle)))
            .collect();

        let mut report = TickReport::default();
        for (id, handle) in snapshot {
            let mut robot = handle.lock();
            let loaded = self.load_robot(&mut robot, &mut report)?;
            if loaded > 0 {
                self.deregister_waiting(id);
                robot.dispatch();
                report.dispatched.push(id);
                report.loaded += loaded;
                tracing::info!("robot {} dispatched with {} items", id, loaded);
            }
        }
        Ok(report)
    }

    /// Stage mail for one robot and commit it to the robot's tube.
    /// Returns the number of items committed.
    fn load_robot(&mut self, robot: &mut R, report: &mut TickReport) -> Result<usize, PoolError> {
        let id = robot.id();
        if !robot.tube().is_empty() {
            tracing::debug!("robot {} still holds mail, not loading", id);
            return Ok(0);
        }

        let limit = Self::staging_limit(robot);
        if limit == 0 {
            return Ok(0);
        }

        let capabilities = robot.capabilities();
        let mut staging = Vec::with_capacity(limit);

        if capabilities.careful {
            if let Some(at) = self.pending.iter().position(ItemDescriptor::is_fragile) {
                staging.push(self.take(at));
            }
        }

        if staging.is_empty() {
            if capabilities.strong {
                self.stage_bulk(&mut staging, limit);
            } else {
                self.stage_light(&mut staging, limit);
            }
        }

        tracing::debug!(
            "robot {} staged {} items (strong={}, careful={})",
            id,
            staging.len(),
            capabilities.strong,
            capabilities.careful
        );
        if staging.is_empty() {
            return Ok(0);
        }
        self.commit(robot, staging, report)
    }

    /// Staging never exceeds the room left in the (empty) tube.
    fn staging_limit(robot: &R) -> usize {
        let max_intake = robot.max_intake();
        let capacity = robot.tube().capacity();
        if max_intake > capacity {
            tracing::warn!(
                "robot {} max intake {} exceeds tube capacity {}; clamping",
                robot.id(),
                max_intake,
                capacity
            );
        }
        max_intake.min(capacity)
    }

    /// Strong robots take any non-fragile mail in order.
    fn stage_bulk(&mut self, staging: &mut Vec<ItemDescriptor<M>>, limit: usize) {
        let mut i = 0;
        while staging.len() < limit && i < self.pending.len() {
            if self.pending[i].fragile {
                i += 1;
            } else {
                staging.push(self.take(i));
            }
        }
    }

    /// Other robots take light, non-fragile mail in order.
    fn stage_light(&mut self, staging: &mut Vec<ItemDescriptor<M>>, limit: usize) {
        let mut i = 0;
        while staging.len() < limit && self.light_count > 0 && i < self.pending.len() {
            let candidate = &self.pending[i];
            if candidate.heavy || candidate.fragile {
                i += 1;
            } else {
                staging.push(self.take(i));
            }
        }
    }

    /// Move staged mail into the robot's tube so that `remove_top` yields it
    /// in staged order. A broken fragile item undoes the whole load.
    fn commit(
        &mut self,
        robot: &mut R,
        staging: Vec<ItemDescriptor<M>>,
        report: &mut TickReport,
    ) -> Result<usize, PoolError> {
        let id = robot.id();
        let mut committed: Vec<Committed> = Vec::with_capacity(staging.len());
        let mut staged = staging.into_iter().rev();

        while let Some(descriptor) = staged.next() {
            let (keys, mut mail) = descriptor.split();
            let mail_id = mail.id().to_owned();

            loop {
                match robot.tube_mut().add(mail) {
                    Ok(()) => {
                        committed.push((keys, mail_id));
                        break;
                    }
                    Err(TubeError::Full { capacity, item }) => {
                        // everything committed so far is served after this item
                        if self.evict_top(robot, &mut committed, capacity, report) {
                            mail = item;
                            continue;
                        }
                        tracing::error!(
                            "robot {} tube full (capacity {}), returning mail {} to the pool",
                            id,
                            capacity,
                            mail_id
                        );
                        self.restore(keys.attach(item));
                        report.failures.push(PoolError::TubeFull {
                            robot: id,
                            mail_id,
                            capacity,
                        });
                        break;
                    }
                    Err(TubeError::FragileBroken { item }) => {
                        tracing::error!("fragile mail {} broken while loading robot {}", mail_id, id);
                        self.restore(keys.attach(item));
                        for rest in staged.by_ref() {
                            self.restore(rest);
                        }
                        self.roll_back(robot, committed);
                        return Err(PoolError::FragileItemBroken { robot: id, mail_id });
                    }
                }
            }
        }

        if let Some(sink) = self.audit.as_mut() {
            for (_, mail_id) in committed.iter().rev() {
                sink.record(build_audit_event(mail_id.as_str(), Some(id), "dispatch", None));
            }
        }
        Ok(committed.len())
    }

    /// Return the top committed item to the pool to make room. Returns false
    /// when nothing can be evicted.
    fn evict_top(
        &mut self,
        robot: &mut R,
        committed: &mut Vec<Committed>,
        capacity: usize,
        report: &mut TickReport,
    ) -> bool {
        let id = robot.id();
        let Some((keys, mail_id)) = committed.pop() else {
            return false;
        };
        let Some(mail) = robot.tube_mut().remove_top() else {
            tracing::error!("robot {} tube lost mail {}", id, mail_id);
            return false;
        };
        tracing::error!(
            "robot {} tube full (capacity {}), returning mail {} to the pool",
            id,
            capacity,
            mail_id
        );
        self.restore(keys.attach(mail));
        report.failures.push(PoolError::TubeFull {
            robot: id,
            mail_id,
            capacity,
        });
        true
    }

    /// Take committed items back out of the tube and return them to the pool.
    fn roll_back(&mut self, robot: &mut R, committed: Vec<Committed>) {
        let id = robot.id();
        for (keys, mail_id) in committed.into_iter().rev() {
            match robot.tube_mut().remove_top() {
                Some(mail) => self.restore(keys.attach(mail)),
                None => {
                    tracing::error!("robot {} tube lost mail {}", id, mail_id);
                    break;
                }
            }
        }
        tracing::warn!("robot {} load rolled back", id);
    }

    fn insert(&mut self, descriptor: ItemDescriptor<M>) {
        if !descriptor.heavy {
            self.light_count += 1;
        }
        insert_ordered(&mut self.pending, descriptor);
    }

    fn take(&mut self, at: usize) -> ItemDescriptor<M> {
        let descriptor = self.pending.remove(at);
        if !descriptor.heavy {
            self.light_count -= 1;
        }
        descriptor
    }

    fn restore(&mut self, descriptor: ItemDescriptor<M>) {
        if let Some(sink) = self.audit.as_mut() {
            sink.record(build_audit_event(descriptor.mail.id(), None, "requeue", None));
        }
        self.insert(descriptor);
    }
}

/// [`MailPool`] behind a single `parking_lot::Mutex`.
///
/// Every operation holds the pool lock for its whole duration, so matching
/// passes never interleave with intake. Lock order is pool, then robot:
/// do not call into the pool while holding a robot's lock.
pub struct SharedMailPool<M, R> {
    inner: Arc<Mutex<MailPool<M, R>>>,
}

impl<M, R> Clone for SharedMailPool<M, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M, R> SharedMailPool<M, R>
where
    M: Mail,
    R: Robot<M>,
{
    /// Share an existing pool.
    pub fn new(pool: MailPool<M, R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    /// See [`MailPool::add_item`].
    pub fn add_item(&self, mail: M) {
        self.inner.lock().add_item(mail);
    }

    /// See [`MailPool::step`].
    pub fn step(&self) -> Result<TickReport, PoolError> {
        self.inner.lock().step()
    }

    /// See [`MailPool::register_waiting`].
    pub fn register_waiting(&self, handle: RobotHandle<R>) {
        self.inner.lock().register_waiting(handle);
    }

    /// See [`MailPool::deregister_waiting`].
    pub fn deregister_waiting(&self, id: RobotId) -> bool {
        self.inner.lock().deregister_waiting(id)
    }

    /// Number of pending items.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether no mail is pending.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Number of pending items that are not heavy.
    pub fn light_count(&self) -> usize {
        self.inner.lock().light_count()
    }

    /// Run a read-only closure against the locked pool.
    pub fn with_pool<T>(&self, f: impl FnOnce(&MailPool<M, R>) -> T) -> T {
        f(&*self.inner.lock())
    }
}
