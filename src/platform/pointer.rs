//! Pointer input for the joystick
//!
//! `PointerTracker` decides which pointer owns the joystick; `PointerBinding`
//! wires browser pointer events to a joystick and unregisters them on drop.

use glam::Vec2;

use crate::control::Joystick;

/// Follows the single pointer that is dragging the joystick.
///
/// Other pointers (a second finger, say) are ignored until the owner lifts.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PointerTracker {
    active: Option<i32>,
}

impl PointerTracker {
    pub fn active(&self) -> Option<i32> {
        self.active
    }

    /// Pointer went down at a host-space point. Returns whether it took the
    /// joystick.
    pub fn down(&mut self, id: i32, point: Vec2, joystick: &mut Joystick) -> bool {
        if self.active.is_some() {
            return false;
        }
        let local = joystick.to_local(point);
        if !joystick.contains(local) {
            return false;
        }
        if joystick.press(local) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Pointer moved anywhere on the page
    pub fn moved(&self, id: i32, point: Vec2, joystick: &mut Joystick) -> bool {
        if self.active != Some(id) {
            return false;
        }
        joystick.drag_to(joystick.to_local(point)).is_some()
    }

    /// Pointer lifted or was cancelled, inside or outside the widget
    pub fn up(&mut self, id: i32, joystick: &mut Joystick) -> bool {
        if self.active != Some(id) {
            return false;
        }
        self.active = None;
        joystick.release()
    }
}

#[cfg(target_arch = "wasm32")]
pub use binding::PointerBinding;

#[cfg(target_arch = "wasm32")]
mod binding {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, HtmlCanvasElement, PointerEvent};

    use super::PointerTracker;
    use crate::control::Joystick;

    type Listener = Closure<dyn FnMut(PointerEvent)>;

    /// Pointer listeners bound to one joystick for as long as this value lives
    pub struct PointerBinding {
        listeners: Vec<(EventTarget, &'static str, Listener)>,
    }

    /// Pointer position relative to the canvas' top-left corner
    fn canvas_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            event.client_x() as f32 - rect.left() as f32,
            event.client_y() as f32 - rect.top() as f32,
        )
    }

    impl PointerBinding {
        /// Press on the canvas; move and release on the window so a drag that
        /// leaves the widget (or the canvas) still ends.
        pub fn bind(
            canvas: &HtmlCanvasElement,
            joystick: Rc<RefCell<Joystick>>,
        ) -> Result<Self, JsValue> {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            let canvas_target: EventTarget = AsRef::<EventTarget>::as_ref(canvas).clone();
            let window_target: EventTarget = AsRef::<EventTarget>::as_ref(&window).clone();

            // Touch drags must reach us as pointer events instead of scrolling
            if let Err(e) = canvas.style().set_property("touch-action", "none") {
                log::warn!("Failed to set touch-action: {:?}", e);
            }

            let tracker = Rc::new(RefCell::new(PointerTracker::default()));
            let mut binding = Self {
                listeners: Vec::with_capacity(4),
            };

            {
                let tracker = tracker.clone();
                let joystick = joystick.clone();
                let canvas = canvas.clone();
                let listener = Listener::new(move |event: PointerEvent| {
                    let point = canvas_point(&canvas, &event);
                    let taken = tracker.borrow_mut().down(
                        event.pointer_id(),
                        point,
                        &mut joystick.borrow_mut(),
                    );
                    if taken {
                        event.prevent_default();
                    }
                });
                binding.listen(canvas_target, "pointerdown", listener)?;
            }

            {
                let tracker = tracker.clone();
                let joystick = joystick.clone();
                let canvas = canvas.clone();
                let listener = Listener::new(move |event: PointerEvent| {
                    let point = canvas_point(&canvas, &event);
                    tracker
                        .borrow()
                        .moved(event.pointer_id(), point, &mut joystick.borrow_mut());
                });
                binding.listen(window_target.clone(), "pointermove", listener)?;
            }

            for kind in ["pointerup", "pointercancel"] {
                let tracker = tracker.clone();
                let joystick = joystick.clone();
                let listener = Listener::new(move |event: PointerEvent| {
                    tracker
                        .borrow_mut()
                        .up(event.pointer_id(), &mut joystick.borrow_mut());
                });
                binding.listen(window_target.clone(), kind, listener)?;
            }

            log::info!("Joystick pointer listeners bound");
            Ok(binding)
        }

        fn listen(
            &mut self,
            target: EventTarget,
            kind: &'static str,
            listener: Listener,
        ) -> Result<(), JsValue> {
            target.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
            self.listeners.push((target, kind, listener));
            Ok(())
        }
    }

    impl Drop for PointerBinding {
        fn drop(&mut self) {
            for (target, kind, listener) in self.listeners.drain(..) {
                let _ = target
                    .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref());
            }
            log::info!("Joystick pointer listeners released");
        }
    }
}
