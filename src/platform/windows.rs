#![cfg(target_os = "windows")]

use anyhow::{anyhow, Result};
use windows::{
    core::{Interface, BSTR},
    Win32::{
        System::Com::{CoCreateInstance, CoInitializeEx, CLSCTX_ALL, COINIT_MULTITHREADED},
        UI::Accessibility::{
            CUIAutomation, IUIAutomation, IUIAutomationElement, IUIAutomationValuePattern,
            UIA_ComboBoxControlTypeId, UIA_DocumentControlTypeId, UIA_EditControlTypeId,
            UIA_TextControlTypeId, UIA_ValuePatternId,
        },
    },
};

use crate::automation::types::{NodeId, NodeInfo};

/// Focused-element access through Windows UI Automation
///
/// Note: COM objects are created fresh in each call on the blocking thread
/// that uses them.
pub struct WindowsFocus;

impl WindowsFocus {
    pub fn new() -> Result<Self> {
        Self::create_automation()?;
        Ok(Self)
    }

    /// Create a new UI Automation instance (must be called on the thread that will use it)
    fn create_automation() -> Result<IUIAutomation> {
        unsafe {
            let _ = CoInitializeEx(None, COINIT_MULTITHREADED);
            CoCreateInstance(&CUIAutomation, None, CLSCTX_ALL)
                .map_err(|e| anyhow!("Failed to create UIAutomation: {}", e))
        }
    }

    fn control_type_name(control_type_id: i32) -> &'static str {
        match control_type_id {
            x if x == UIA_EditControlTypeId.0 => "Edit",
            x if x == UIA_DocumentControlTypeId.0 => "Document",
            x if x == UIA_ComboBoxControlTypeId.0 => "ComboBox",
            x if x == UIA_TextControlTypeId.0 => "Text",
            _ => "Other",
        }
    }

    /// Runtime ID joined with dots, stable while the element lives
    fn runtime_id(element: &IUIAutomationElement) -> Option<NodeId> {
        unsafe {
            element.GetRuntimeId().ok().and_then(|arr| {
                if arr.is_null() {
                    return None;
                }
                let bounds = (*arr).rgsabound[0];
                let data = (*arr).pvData as *const i32;
                let mut parts = Vec::new();
                for i in 0..bounds.cElements.min(10) {
                    parts.push((*data.add(i as usize)).to_string());
                }
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("."))
                }
            })
        }
    }

    fn value_pattern(element: &IUIAutomationElement) -> Option<IUIAutomationValuePattern> {
        unsafe {
            element
                .GetCurrentPattern(UIA_ValuePatternId)
                .ok()
                .and_then(|pattern| pattern.cast::<IUIAutomationValuePattern>().ok())
        }
    }

    fn element_to_node(element: &IUIAutomationElement) -> Result<NodeInfo> {
        let id = Self::runtime_id(element)
            .ok_or_else(|| anyhow!("Focused element has no runtime ID"))?;

        unsafe {
            let control_type = element.CurrentControlType().map(|c| c.0).unwrap_or(0);
            let is_enabled = element.CurrentIsEnabled().map(|b| b.as_bool()).unwrap_or(false);
            let has_focus = element
                .CurrentHasKeyboardFocus()
                .map(|b| b.as_bool())
                .unwrap_or(false);

            let value_pattern = Self::value_pattern(element);
            let read_only = value_pattern
                .as_ref()
                .and_then(|vp| vp.CurrentIsReadOnly().ok())
                .map(|b| b.as_bool())
                .unwrap_or(true);
            let text = value_pattern
                .as_ref()
                .and_then(|vp| vp.CurrentValue().ok())
                .map(|s| s.to_string());

            Ok(NodeInfo {
                id,
                class_name: Some(Self::control_type_name(control_type).to_string()),
                text,
                is_focused: has_focus,
                is_editable: is_enabled && !read_only,
            })
        }
    }

    /// Snapshot of the element with keyboard focus
    pub async fn focused_node(&self) -> Result<Option<NodeInfo>> {
        tokio::task::spawn_blocking(move || {
            let automation = Self::create_automation()?;

            let element = match unsafe { automation.GetFocusedElement() } {
                Ok(element) => element,
                Err(e) => {
                    tracing::debug!("No focused element: {}", e);
                    return Ok(None);
                }
            };

            Self::element_to_node(&element).map(Some)
        })
        .await
        .map_err(|e| anyhow!("Task join error: {}", e))?
    }

    /// Set the value of the focused element, provided it is still `node`.
    ///
    /// Returns false when focus moved elsewhere or the element became
    /// read-only since it was resolved.
    pub async fn set_focused_value(&self, node: &NodeId, text: &str) -> Result<bool> {
        let node = node.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let automation = Self::create_automation()?;

            unsafe {
                let element = automation
                    .GetFocusedElement()
                    .map_err(|e| anyhow!("Failed to get focused element: {}", e))?;

                if Self::runtime_id(&element).as_deref() != Some(node.as_str()) {
                    tracing::debug!("Focus moved away from {} before set-text", node);
                    return Ok(false);
                }

                let Some(value_pattern) = Self::value_pattern(&element) else {
                    return Ok(false);
                };
                if value_pattern
                    .CurrentIsReadOnly()
                    .map(|b| b.as_bool())
                    .unwrap_or(true)
                {
                    return Ok(false);
                }

                let bstr = BSTR::from(text.as_str());
                value_pattern
                    .SetValue(&bstr)
                    .map_err(|e| anyhow!("Failed to set value: {}", e))?;

                Ok(true)
            }
        })
        .await
        .map_err(|e| anyhow!("Task join error: {}", e))?
    }
}
