use crate::constants::{HIDDEN_CLASS, INFO_BODY_ID, INFO_PANEL_ID, INFO_TITLE_ID};
use pano_core::InfoPayload;
use web_sys as web;

pub fn show_info(document: &web::Document, info: &InfoPayload) {
    let Some(panel) = document.get_element_by_id(INFO_PANEL_ID) else {
        return;
    };
    if let Some(el) = document.get_element_by_id(INFO_TITLE_ID) {
        el.set_text_content(Some(&info.title));
    }
    if let Some(el) = document.get_element_by_id(INFO_BODY_ID) {
        el.set_text_content(Some(&info.description));
    }
    _ = panel.class_list().remove_1(HIDDEN_CLASS);
    // fallback for pages without the CSS class
    _ = panel.set_attribute("style", "");
}

pub fn hide_info(document: &web::Document) {
    if let Some(panel) = document.get_element_by_id(INFO_PANEL_ID) {
        _ = panel.class_list().add_1(HIDDEN_CLASS);
        _ = panel.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_info_visible(document: &web::Document) -> bool {
    document
        .get_element_by_id(INFO_PANEL_ID)
        .map(|el| !el.class_list().contains(HIDDEN_CLASS))
        .unwrap_or(false)
}
