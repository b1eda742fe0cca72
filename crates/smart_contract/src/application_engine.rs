//! The engine that runs contract scripts against ledger state.
//!
//! [`ApplicationEngine`] wires an [`ExecutionEngine`] to a [`StateMachine`]
//! whose writes land in a [`CloneCache`] over the caller's cache. When the
//! script halts the clone is merged into the parent; when it faults the
//! clone is dropped and the parent never sees the writes.

use std::rc::Rc;
use std::sync::Arc;

use sidechain_config::VmSettings;
use sidechain_core::Transaction;
use sidechain_persistence::{CloneCache, DBCache, DataCache, Store};
use sidechain_vm::{ExecutionEngine, ExecutionEngineLimits, StackItem, TriggerType, VMState};
use tracing::{debug, warn};

use crate::blockchain::Blockchain;
use crate::code_table::CacheCodeTable;
use crate::error::{ContractError, ContractResult};
use crate::events::{EventRecorder, LogEvent, NotifyEvent};
use crate::state_machine::StateMachine;

/// One script execution with its own state snapshot.
pub struct ApplicationEngine {
    engine: ExecutionEngine,
    cache: Arc<CloneCache>,
    machine: StateMachine,
}

impl ApplicationEngine {
    /// Creates an engine whose writes are buffered over `parent`.
    pub fn new(
        trigger: TriggerType,
        container: Option<Rc<Transaction>>,
        chain: Rc<dyn Blockchain>,
        parent: Arc<dyn DataCache>,
        settings: &VmSettings,
    ) -> Self {
        let cache = Arc::new(CloneCache::new(parent));
        let machine = StateMachine::new(chain, cache.clone());
        let table = CacheCodeTable::new(cache.clone());

        let mut engine = ExecutionEngine::with_service(Rc::new(machine.service()))
            .with_script_table(Rc::new(table))
            .with_limits(ExecutionEngineLimits::from(settings))
            .with_gas_limit(settings.gas_limit)
            .with_trigger(trigger);
        if let Some(container) = container {
            engine = engine.with_container(container);
        }

        Self {
            engine,
            cache,
            machine,
        }
    }

    /// Runs `script` as an application of `container` directly over a store.
    ///
    /// The store only changes if the script halts.
    pub fn run(
        script: &[u8],
        container: Option<Rc<Transaction>>,
        chain: Rc<dyn Blockchain>,
        store: Arc<dyn Store>,
        settings: &VmSettings,
    ) -> ContractResult<Self> {
        let root = Arc::new(DBCache::new(store));
        let mut engine = Self::new(
            TriggerType::Application,
            container,
            chain,
            root.clone(),
            settings,
        );
        engine.load_script(script.to_vec())?;
        if engine.execute()? == VMState::HALT {
            root.commit()?;
        }
        Ok(engine)
    }

    pub fn load_script(&mut self, script: Vec<u8>) -> ContractResult<()> {
        self.engine
            .load_script(script, false)
            .map_err(ContractError::Script)
    }

    /// Runs the loaded script to completion or to a breakpoint.
    ///
    /// A HALT merges the buffered writes into the parent cache and a FAULT
    /// discards them. A BREAK keeps them buffered so execution can resume.
    pub fn execute(&mut self) -> ContractResult<VMState> {
        let state = self.engine.execute();
        match state {
            VMState::HALT => {
                self.cache.commit()?;
                debug!(
                    gas_consumed = self.engine.gas_consumed(),
                    notifications = self.machine.events().notifications().len(),
                    "script halted"
                );
            }
            VMState::FAULT => {
                self.cache.rollback();
                warn!(
                    reason = ?self.engine.fault_reason(),
                    error = ?self.engine.fault_error().map(ToString::to_string),
                    gas_consumed = self.engine.gas_consumed(),
                    "script faulted"
                );
            }
            VMState::BREAK | VMState::NONE => {}
        }
        Ok(state)
    }

    pub fn state(&self) -> VMState {
        self.engine.state()
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ExecutionEngine {
        &mut self.engine
    }

    /// The buffered state of this execution.
    pub fn cache(&self) -> &Arc<CloneCache> {
        &self.cache
    }

    pub fn events(&self) -> &EventRecorder {
        self.machine.events()
    }

    pub fn notifications(&self) -> Vec<NotifyEvent> {
        self.machine.events().notifications()
    }

    pub fn logs(&self) -> Vec<LogEvent> {
        self.machine.events().logs()
    }

    /// The evaluation stack, top first.
    pub fn result_stack(&self) -> Vec<StackItem> {
        self.engine.evaluation_stack().iter().cloned().collect()
    }

    pub fn gas_consumed(&self) -> i64 {
        self.engine.gas_consumed()
    }
}
