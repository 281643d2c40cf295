use murmur_types::DeviceClass;
use serde::Serialize;

use crate::gesture::GestureAction;

/// Session-local UI flags of one rendered message. Never shared between
/// messages and never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InteractionState {
    pub mouse_hover: bool,
    /// Set by an open menu so the hover styling outlives the pointer.
    pub supposed_hover: bool,
    pub show_mobile_menu: bool,
    #[serde(skip)]
    device: DeviceClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    MouseOver,
    MouseLeave,
    SetSupposedHover(bool),
    Gesture(GestureAction),
    HideMobileMenu,
}

impl InteractionState {
    pub fn new(device: DeviceClass) -> Self {
        Self {
            device,
            ..Default::default()
        }
    }

    /// Apply one interaction. Returns whether anything changed, so the host
    /// can skip a redraw.
    pub fn update(&mut self, interaction: Interaction) -> bool {
        let before = *self;
        match interaction {
            Interaction::MouseOver => self.mouse_hover = true,
            Interaction::MouseLeave => self.mouse_hover = false,
            Interaction::SetSupposedHover(value) => self.supposed_hover = value,
            Interaction::Gesture(GestureAction::LongPress) => {
                if self.device.is_mobile() {
                    self.show_mobile_menu = true;
                }
            }
            // A plain tap does nothing on the message container.
            Interaction::Gesture(GestureAction::Click) => {}
            Interaction::HideMobileMenu => self.show_mobile_menu = false,
        }
        *self != before
    }

    pub fn hover_class(&self) -> Option<&'static str> {
        self.supposed_hover.then_some("mouse-hover")
    }
}
