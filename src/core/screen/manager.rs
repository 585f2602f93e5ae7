//=========================================================================
// Screen Manager
//=========================================================================
//
// Manages screen registration, the active screen, and transitions.
//
// Screens are stored in a HashMap by key and referenced by the active key.
// This allows screens to keep their state between activations.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Screen, ScreenContext, Transition};

//=== Screen Key Trait ====================================================

/// Marker trait for screen identifiers.
///
/// Screen keys uniquely identify screens in the ScreenManager's HashMap.
/// Typically implemented by a game-specific enum listing every screen.
pub trait ScreenKey: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== Screen Manager ======================================================

/// Owns every screen and drives the single active one.
///
/// At most one screen is active. `None` is the terminal state: once reached,
/// no further callbacks are delivered and the loop ends.
pub struct ScreenManager<K: ScreenKey> {
    screens: HashMap<K, Box<dyn Screen<K>>>,
    active: Option<K>,
    timer_enabled: bool,
    context: ScreenContext<K>,
}

impl<K: ScreenKey> ScreenManager<K> {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with no active screen.
    pub fn new(context: ScreenContext<K>) -> Self {
        Self {
            screens: HashMap::new(),
            active: None,
            timer_enabled: false,
            context,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a screen under `key`.
    ///
    /// Screens must be registered before they can be entered.
    pub fn register_screen<T>(&mut self, key: K, screen: T)
    where
        T: Screen<K> + 'static,
    {
        self.register_boxed(key, Box::new(screen));
    }

    /// Registers an already boxed screen under `key`.
    pub fn register_boxed(&mut self, key: K, screen: Box<dyn Screen<K>>) {
        if self.screens.insert(key, screen).is_some() {
            warn!(target: "screens", "Screen {:?} was already registered and has been replaced", key);
        }
    }

    /// Returns `true` if a screen is registered under `key`.
    pub fn is_registered(&self, key: K) -> bool {
        self.screens.contains_key(&key)
    }

    //--- State ------------------------------------------------------------

    /// Currently active screen, if any.
    pub fn active(&self) -> Option<K> {
        self.active
    }

    /// Returns `true` while a screen is active (the loop keeps running).
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Returns `true` once a tick has been discarded since the last
    /// non-seamless transition.
    pub fn timer_warmed_up(&self) -> bool {
        self.timer_enabled
    }

    pub fn context(&self) -> &ScreenContext<K> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ScreenContext<K> {
        &mut self.context
    }

    //--- Transitions ------------------------------------------------------

    /// Makes `next` the active screen.
    ///
    /// The outgoing screen's `leave` runs before the incoming screen's
    /// `enter`. Transitions requested during either are applied afterwards,
    /// in order.
    pub fn goto(&mut self, next: Option<K>, seamless: bool) {
        self.transition(next, seamless);
        self.apply_pending();
    }

    //--- Dispatch ---------------------------------------------------------

    /// Invokes `f` on the active screen, then applies any transitions it
    /// requested. Does nothing when no screen is active.
    pub fn dispatch<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn Screen<K>, &mut ScreenContext<K>),
    {
        let Some(key) = self.active else {
            return;
        };

        if let Some(screen) = self.screens.get_mut(&key) {
            f(screen.as_mut(), &mut self.context);
        }

        self.apply_pending();
    }

    /// Delivers one simulation tick.
    ///
    /// The first tick after a non-seamless transition only warms the timer
    /// up and never reaches the screen.
    pub fn tick(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }

        if !self.timer_enabled {
            self.timer_enabled = true;
            return;
        }

        self.context.screen_time += dt;
        self.dispatch(|screen, ctx| screen.timer(dt, ctx));
    }

    //--- Internal Helpers -------------------------------------------------

    fn transition(&mut self, next: Option<K>, seamless: bool) {
        if next.is_some() && next == self.active {
            warn!(target: "screens", "Screen {:?} is already active, skipping transition", next);
            return;
        }

        if let Some(key) = next {
            if !self.screens.contains_key(&key) {
                warn!(target: "screens", "Attempted to enter unregistered screen {:?}", key);
                return;
            }
        }

        debug!(target: "screens", "Screen transition {:?} -> {:?} (seamless: {})", self.active, next, seamless);

        if let Some(current) = self.active {
            if let Some(screen) = self.screens.get_mut(&current) {
                screen.leave(next, &mut self.context);
            }
        }

        let previous = self.active;

        self.active = next;
        self.context.screen_time = 0.0;
        self.timer_enabled = self.timer_enabled && seamless;

        if let Some(key) = next {
            if let Some(screen) = self.screens.get_mut(&key) {
                screen.enter(previous, &mut self.context);
            }
        }
    }

    fn apply_pending(&mut self) {
        loop {
            let pending: Vec<Transition<K>> = self.context.transitions.take();
            if pending.is_empty() {
                break;
            }

            for t in pending {
                self.transition(t.target, t.seamless);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
