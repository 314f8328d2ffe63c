// Browser smoke tests (`wasm-pack test --headless --chrome`).
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_builds_reels_and_accepts_a_spin() {
    dread_spinner::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    for id in ["spinnerOneAnimation", "spinnerTwoAnimation", "spinnerThreeAnimation"] {
        assert!(doc.get_element_by_id(id).is_some(), "missing canvas {}", id);
    }
    assert!(dread_spinner::ready_for_spin());
    // no bet field on the test page: the session's default bet is used
    assert!(dread_spinner::spin());
    assert!(!dread_spinner::ready_for_spin());
    assert!(!dread_spinner::spin());
}

#[wasm_bindgen_test]
fn starting_twice_keeps_a_single_machine() {
    dread_spinner::start_game().unwrap();
    let ready = dread_spinner::ready_for_spin();
    dread_spinner::start_game().unwrap();
    // the running session is kept, not replaced by a fresh ready one
    assert_eq!(dread_spinner::ready_for_spin(), ready);
    let doc = web_sys::window().unwrap().document().unwrap();
    let canvases = doc.query_selector_all("canvas#spinnerOneAnimation").unwrap();
    assert_eq!(canvases.length(), 1);
}
