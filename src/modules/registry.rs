//! Module registry and lifecycle dispatcher
//!
//! The registry owns the modules in a fixed order, which is also the tie-break
//! order for icons of equal priority. Every broadcast walks that order and
//! only reaches modules whose slot is initialized.
//!
//! # Failure Policy
//!
//! A failing `init` leaves the slot uninitialized; the module is skipped by
//! every later broadcast and is not retried. A failing `fini` is logged, and
//! the slot is cleared anyway.

use super::{Module, ModuleContext};
use crate::icon::IconList;
use crate::platform::{MinictrlAction, PlatformEvent};
use tracing::{debug, info, warn};

/// Number of modules brought up by `init_first`
pub const FIRST_STAGE_MODULES: usize = 6;

struct ModuleSlot {
    module: Box<dyn Module>,
    initialized: bool,
}

/// Ordered module registry
pub struct Registry {
    slots: Vec<ModuleSlot>,
    display_list: IconList,
    first_stage: usize,
}

impl Registry {
    /// Build a registry from modules in display-priority order
    pub fn new(modules: Vec<Box<dyn Module>>) -> Self {
        Self {
            slots: modules
                .into_iter()
                .map(|module| ModuleSlot {
                    module,
                    initialized: false,
                })
                .collect(),
            display_list: IconList::new(),
            first_stage: FIRST_STAGE_MODULES,
        }
    }

    /// Override how many modules `init_first` brings up
    #[must_use]
    pub fn with_first_stage(mut self, count: usize) -> Self {
        self.first_stage = count;
        self
    }

    /// Initialize every module that is not initialized yet
    ///
    /// Returns the number of modules that became initialized.
    pub fn init(&mut self, ctx: &ModuleContext) -> usize {
        let count = self.slots.len();
        let started = self.init_range(count, ctx);
        info!(
            "Initialized {} module(s), {}/{} running",
            started,
            self.initialized_count(),
            count
        );
        started
    }

    /// Initialize only the first-stage modules
    pub fn init_first(&mut self, ctx: &ModuleContext) -> usize {
        let count = self.first_stage.min(self.slots.len());
        let started = self.init_range(count, ctx);
        info!("First stage initialized {} of {} module(s)", started, count);
        started
    }

    fn init_range(&mut self, count: usize, ctx: &ModuleContext) -> usize {
        let mut started = 0;
        for slot in self.slots.iter_mut().take(count) {
            self.display_list.insert(slot.module.descriptor());
            if slot.initialized {
                continue;
            }
            match slot.module.init(ctx) {
                Ok(()) => {
                    debug!("Module {} initialized", slot.module.name());
                    slot.initialized = true;
                    started += 1;
                }
                Err(e) => {
                    warn!("Module {} failed to initialize: {}", slot.module.name(), e);
                }
            }
        }
        started
    }

    /// Shut down every initialized module and release the display list
    pub fn fini(&mut self, ctx: &ModuleContext) {
        for slot in self.slots.iter_mut().filter(|slot| slot.initialized) {
            if let Err(e) = slot.module.fini(ctx) {
                warn!("Module {} failed to shut down: {}", slot.module.name(), e);
            }
            slot.initialized = false;
        }
        self.display_list.free_all();
        info!("All modules shut down");
    }

    /// Broadcast a display-language change
    pub fn language_changed(&mut self, ctx: &ModuleContext) {
        for slot in self.running() {
            slot.module.language_changed(ctx);
        }
    }

    /// Broadcast a region-format change
    pub fn region_changed(&mut self, ctx: &ModuleContext) {
        for slot in self.running() {
            slot.module.region_changed(ctx);
        }
    }

    /// Broadcast a mini-controller action
    pub fn minictrl_control(&mut self, action: MinictrlAction, name: &str, ctx: &ModuleContext) {
        for slot in self.running() {
            slot.module.minictrl_control(action, name, ctx);
        }
    }

    /// Let modules resynchronize after the display came back on
    pub fn wake_up(&mut self, ctx: &ModuleContext) {
        for slot in self.running() {
            if let Err(e) = slot.module.wake_up(ctx) {
                warn!("Module {} failed to wake up: {}", slot.module.name(), e);
            }
        }
    }

    /// Deliver a platform notification
    pub fn dispatch(&mut self, event: &PlatformEvent, ctx: &ModuleContext) {
        for slot in self.running() {
            slot.module.handle_event(event, ctx);
        }
    }

    /// Screen-reader text of every running module that has one
    pub fn accessibility_descriptions(&self) -> Vec<(&'static str, String)> {
        self.slots
            .iter()
            .filter(|slot| slot.initialized)
            .filter_map(|slot| {
                slot.module
                    .accessibility_description()
                    .map(|text| (slot.module.name(), text))
            })
            .collect()
    }

    fn running(&mut self) -> impl Iterator<Item = &mut ModuleSlot> {
        self.slots.iter_mut().filter(|slot| slot.initialized)
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the registry has no modules
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Module names in registry order
    pub fn names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.module.name()).collect()
    }

    /// Look up a module by name
    pub fn module(&self, name: &str) -> Option<&dyn Module> {
        self.slots
            .iter()
            .find(|slot| slot.module.name() == name)
            .map(|slot| slot.module.as_ref())
    }

    /// Whether the module called `name` is initialized
    pub fn is_initialized(&self, name: &str) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.initialized && slot.module.name() == name)
    }

    /// Number of initialized modules
    pub fn initialized_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.initialized).count()
    }

    /// Display list of registered icons
    pub fn display_list(&self) -> &IconList {
        &self.display_list
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("modules", &self.names())
            .field("initialized", &self.initialized_count())
            .field("first_stage", &self.first_stage)
            .finish()
    }
}
