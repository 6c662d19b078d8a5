//! Bridge WASM <-> JavaScript trung lập framework.

use roster_core::{assemble_rows, Note, Patient};
use roster_data::find_patient;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

fn parse_collections(
    patients: JsValue,
    notes: JsValue,
) -> Result<(Vec<Patient>, Vec<Note>), JsValue> {
    let patients: Vec<Patient> = from_value(patients)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được danh sách bệnh nhân: {err}")))?;
    let notes: Vec<Note> = from_value(notes)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được danh sách ghi chú: {err}")))?;
    Ok((patients, notes))
}

/// Ghép hai bộ sưu tập JSON thành danh sách dòng đã join cho bảng.
#[wasm_bindgen]
pub fn assemble_roster(patients: JsValue, notes: JsValue) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let (patients, notes) = parse_collections(patients, notes)?;
    let rows = assemble_rows(&patients, &notes);

    to_value(&rows)
        .map_err(|err| JsValue::from_str(&format!("Không serialize được danh sách dòng: {err}")))
}

/// Tìm một bệnh nhân cho trang chi tiết.
/// Id thiếu hoặc không khớp hồ sơ nào trả về lỗi not-found cho phía gọi.
#[wasm_bindgen]
pub fn resolve_patient(
    patients: JsValue,
    notes: JsValue,
    patient_id: Option<i32>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let (patients, notes) = parse_collections(patients, notes)?;
    let rows = assemble_rows(&patients, &notes);

    let row = find_patient(&rows, patient_id.map(i64::from))
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    to_value(row).map_err(|err| JsValue::from_str(&format!("Không serialize được hồ sơ: {err}")))
}
