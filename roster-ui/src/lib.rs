//! Thành phần giao diện bảng tra cứu bệnh nhân cho môi trường WebAssembly.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use crate::styles;
    use chrono::{DateTime, NaiveDate, Utc};
    use roster_core::{
        assemble_rows, distinct_genders, distinct_hospitals, distinct_providers, Column,
        ColumnFilter, Note, Patient, PatientRow, PatientTable, SortDirection, SortSpec,
        PAGE_SIZES,
    };
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{
        console, Document, Element, HtmlInputElement, HtmlOptionElement, HtmlSelectElement,
        Window,
    };
    use yew::events::{Event, InputEvent};
    use yew::prelude::*;
    use yew::TargetCast;

    #[derive(Properties, PartialEq)]
    pub struct RosterAppProps {
        pub rows: Vec<PatientRow>,
    }

    /// Chuyển giữa bảng tra cứu và trang chi tiết một bệnh nhân.
    #[function_component(RosterApp)]
    fn roster_app(props: &RosterAppProps) -> Html {
        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        let selected = use_state(|| Option::<i64>::None);

        let on_select = {
            let selected = selected.clone();
            Callback::from(move |patient_id: i64| selected.set(Some(patient_id)))
        };
        let on_back = {
            let selected = selected.clone();
            Callback::from(move |event: MouseEvent| {
                event.prevent_default();
                selected.set(None);
            })
        };

        match *selected {
            Some(patient_id) => {
                match props.rows.iter().find(|row| row.patient.id == patient_id) {
                    Some(row) => html! {
                        <PatientDetail row={row.clone()} on_back={on_back} />
                    },
                    None => render_not_found(on_back),
                }
            }
            None => html! {
                <RosterTable rows={props.rows.clone()} on_select={on_select} />
            },
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct RosterTableProps {
        pub rows: Vec<PatientRow>,
        pub on_select: Callback<i64>,
    }

    /// Bảng tra cứu: bộ lọc, sắp xếp, phân trang và mở rộng ghi chú.
    #[function_component(RosterTable)]
    fn roster_table(props: &RosterTableProps) -> Html {
        let table = use_state(|| PatientTable::new(props.rows.clone()));

        let genders = distinct_genders(table.rows());
        let providers = distinct_providers(table.rows());
        let hospitals = distinct_hospitals(table.rows());
        let filters = table.filters().clone();

        let on_name_input = {
            let table = table.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                let mut next = (*table).clone();
                next.set_column_filter(ColumnFilter::Name(input.value()));
                table.set(next);
            })
        };

        let on_gender_change = {
            let table = table.clone();
            Callback::from(move |event: Event| {
                let select: HtmlSelectElement = event.target_unchecked_into();
                let mut next = (*table).clone();
                next.set_column_filter(ColumnFilter::Gender(selected_values(&select)));
                table.set(next);
            })
        };

        let on_dob_start = {
            let table = table.clone();
            Callback::from(move |event: Event| {
                let input: HtmlInputElement = event.target_unchecked_into();
                let mut next = (*table).clone();
                let mut bounds = next.filters().date_of_birth.clone();
                bounds.start = input.value();
                next.set_column_filter(ColumnFilter::DateOfBirth(bounds));
                table.set(next);
            })
        };

        let on_dob_end = {
            let table = table.clone();
            Callback::from(move |event: Event| {
                let input: HtmlInputElement = event.target_unchecked_into();
                let mut next = (*table).clone();
                let mut bounds = next.filters().date_of_birth.clone();
                bounds.end = input.value();
                next.set_column_filter(ColumnFilter::DateOfBirth(bounds));
                table.set(next);
            })
        };

        let on_provider_change = {
            let table = table.clone();
            Callback::from(move |event: Event| {
                let select: HtmlSelectElement = event.target_unchecked_into();
                let mut next = (*table).clone();
                let mut notes = next.filters().notes.clone();
                notes.provider_name = selected_values(&select);
                next.set_column_filter(ColumnFilter::Notes(notes));
                table.set(next);
            })
        };

        let on_hospital_change = {
            let table = table.clone();
            Callback::from(move |event: Event| {
                let select: HtmlSelectElement = event.target_unchecked_into();
                let mut next = (*table).clone();
                let mut notes = next.filters().notes.clone();
                notes.hospital_name = selected_values(&select);
                next.set_column_filter(ColumnFilter::Notes(notes));
                table.set(next);
            })
        };

        let on_note_start = {
            let table = table.clone();
            Callback::from(move |event: Event| {
                let input: HtmlInputElement = event.target_unchecked_into();
                let mut next = (*table).clone();
                let mut notes = next.filters().notes.clone();
                notes.start_date = input.value();
                next.set_column_filter(ColumnFilter::Notes(notes));
                table.set(next);
            })
        };

        let on_note_end = {
            let table = table.clone();
            Callback::from(move |event: Event| {
                let input: HtmlInputElement = event.target_unchecked_into();
                let mut next = (*table).clone();
                let mut notes = next.filters().notes.clone();
                notes.end_date = input.value();
                next.set_column_filter(ColumnFilter::Notes(notes));
                table.set(next);
            })
        };

        let on_note_text_input = {
            let table = table.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                let mut next = (*table).clone();
                let mut notes = next.filters().notes.clone();
                notes.text = input.value();
                next.set_column_filter(ColumnFilter::Notes(notes));
                table.set(next);
            })
        };

        let on_reset_filters = {
            let table = table.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = (*table).clone();
                next.reset_filters();
                table.set(next);
            })
        };

        let on_first_page = page_callback(&table, |table| table.set_page_index(0));
        let on_previous_page = page_callback(&table, |table| {
            let previous = table.page_index().saturating_sub(1);
            table.set_page_index(previous);
        });
        let on_next_page = page_callback(&table, |table| {
            table.set_page_index(table.page_index() + 1);
        });
        let on_last_page = page_callback(&table, |table| {
            let last = table.page_count().saturating_sub(1);
            table.set_page_index(last);
        });

        let on_goto_page = {
            let table = table.clone();
            Callback::from(move |event: Event| {
                let input: HtmlInputElement = event.target_unchecked_into();
                let page = input
                    .value()
                    .parse::<usize>()
                    .map(|page| page.saturating_sub(1))
                    .unwrap_or(0);
                let mut next = (*table).clone();
                next.set_page_index(page);
                table.set(next);
            })
        };

        let on_page_size_change = {
            let table = table.clone();
            Callback::from(move |event: Event| {
                let select: HtmlSelectElement = event.target_unchecked_into();
                let size = select.value().parse::<usize>().unwrap_or(PAGE_SIZES[0]);
                let mut next = (*table).clone();
                next.set_page_size(size);
                table.set(next);
            })
        };

        let visible: Vec<PatientRow> = table.visible_rows().into_iter().cloned().collect();
        let row_count = table.row_count();
        let page_count = table.page_count();

        html! {
            <div class="roster-root">
                <header class="roster-header">
                    <h1>{"Tra cứu bệnh nhân"}</h1>
                    <p>{"Lọc, sắp xếp và xem ghi chú lâm sàng của từng hồ sơ."}</p>
                </header>
                <section class="filter-toolbar" aria-label="Bộ lọc bảng">
                    <label class="filter-field">
                        <span class="filter-label">{"Tên"}</span>
                        <input
                            type="text"
                            placeholder="Lọc theo tên"
                            value={filters.name.clone()}
                            oninput={on_name_input}
                        />
                    </label>
                    <label class="filter-field">
                        <span class="filter-label">{"Giới tính"}</span>
                        <select multiple=true onchange={on_gender_change}>
                            {
                                for genders.iter().map(|gender| html! {
                                    <option
                                        value={gender.clone()}
                                        selected={filters.gender.contains(gender)}
                                    >
                                        { gender.clone() }
                                    </option>
                                })
                            }
                        </select>
                    </label>
                    <label class="filter-field">
                        <span class="filter-label">{"Ngày sinh từ / đến"}</span>
                        <div class="filter-pair">
                            <input
                                type="date"
                                value={filters.date_of_birth.start.clone()}
                                onchange={on_dob_start}
                            />
                            <input
                                type="date"
                                value={filters.date_of_birth.end.clone()}
                                onchange={on_dob_end}
                            />
                        </div>
                    </label>
                    <label class="filter-field">
                        <span class="filter-label">{"Ghi chú của bác sĩ"}</span>
                        <select multiple=true onchange={on_provider_change}>
                            {
                                for providers.iter().map(|provider| html! {
                                    <option
                                        value={provider.clone()}
                                        selected={filters.notes.provider_name.contains(provider)}
                                    >
                                        { provider.clone() }
                                    </option>
                                })
                            }
                        </select>
                    </label>
                    <label class="filter-field">
                        <span class="filter-label">{"Ghi chú tại bệnh viện"}</span>
                        <select multiple=true onchange={on_hospital_change}>
                            {
                                for hospitals.iter().map(|hospital| html! {
                                    <option
                                        value={hospital.clone()}
                                        selected={filters.notes.hospital_name.contains(hospital)}
                                    >
                                        { hospital.clone() }
                                    </option>
                                })
                            }
                        </select>
                    </label>
                    <label class="filter-field">
                        <span class="filter-label">{"Ghi chú viết từ / đến"}</span>
                        <div class="filter-pair">
                            <input
                                type="date"
                                value={filters.notes.start_date.clone()}
                                onchange={on_note_start}
                            />
                            <input
                                type="date"
                                value={filters.notes.end_date.clone()}
                                onchange={on_note_end}
                            />
                        </div>
                    </label>
                    <label class="filter-field">
                        <span class="filter-label">{"Nội dung ghi chú"}</span>
                        <input
                            type="text"
                            placeholder="Lọc theo nội dung ghi chú"
                            value={filters.notes.text.clone()}
                            oninput={on_note_text_input}
                        />
                    </label>
                    <button type="button" class="reset-button" onclick={on_reset_filters}>
                        {"Đặt lại bộ lọc"}
                    </button>
                </section>
                <table class="roster-table">
                    <thead>
                        <tr>
                            { render_sortable_header("Tên", Column::Name, &table) }
                            <th>{"Giới tính"}</th>
                            { render_sortable_header("Ngày sinh", Column::DateOfBirth, &table) }
                            <th>{"Ghi chú"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {
                            if visible.is_empty() {
                                html! {
                                    <tr>
                                        <td colspan="4" class="roster-empty">
                                            {"Không có hồ sơ nào khớp bộ lọc hiện tại."}
                                        </td>
                                    </tr>
                                }
                            } else {
                                html! {
                                    for visible.iter().map(|row| render_row(
                                        row,
                                        &table,
                                        &props.on_select,
                                    ))
                                }
                            }
                        }
                    </tbody>
                </table>
                <footer class="pagination-bar">
                    <div class="pagination-buttons">
                        <button
                            type="button"
                            onclick={on_first_page}
                            disabled={!table.can_previous_page()}
                        >{"«"}</button>
                        <button
                            type="button"
                            onclick={on_previous_page}
                            disabled={!table.can_previous_page()}
                        >{"‹"}</button>
                        <button
                            type="button"
                            onclick={on_next_page}
                            disabled={!table.can_next_page()}
                        >{"›"}</button>
                        <button
                            type="button"
                            onclick={on_last_page}
                            disabled={!table.can_next_page()}
                        >{"»"}</button>
                    </div>
                    <span class="pagination-status">
                        {"Trang "}
                        <strong>{ table.page_index() + 1 }</strong>
                        {" / "}
                        <strong>{ page_count.max(1) }</strong>
                    </span>
                    <label class="pagination-goto">
                        {"Tới trang:"}
                        <input
                            type="number"
                            min="1"
                            max={page_count.max(1).to_string()}
                            value={(table.page_index() + 1).to_string()}
                            onchange={on_goto_page}
                        />
                    </label>
                    <select class="pagination-size" onchange={on_page_size_change}>
                        {
                            for PAGE_SIZES.iter().map(|size| html! {
                                <option
                                    value={size.to_string()}
                                    selected={*size == table.page_size()}
                                >
                                    { format!("Hiển thị {size}") }
                                </option>
                            })
                        }
                    </select>
                    <span class="pagination-count">{ format!("{row_count} dòng khớp bộ lọc") }</span>
                </footer>
            </div>
        }
    }

    fn page_callback<F>(table: &UseStateHandle<PatientTable>, apply: F) -> Callback<MouseEvent>
    where
        F: Fn(&mut PatientTable) + 'static,
    {
        let table = table.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*table).clone();
            apply(&mut next);
            table.set(next);
        })
    }

    fn render_sortable_header(
        label: &str,
        column: Column,
        table: &UseStateHandle<PatientTable>,
    ) -> Html {
        let onclick = {
            let table = table.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = (*table).clone();
                let direction = next_sort_direction(next.sort(), column);
                next.set_sort(column, direction);
                table.set(next);
            })
        };

        html! {
            <th class="sortable" onclick={onclick}>
                { label }
                { sort_marker(table.sort(), column) }
            </th>
        }
    }

    /// Chu trình khi bấm tiêu đề cột: chưa sắp xếp → tăng dần → giảm dần → bỏ.
    fn next_sort_direction(current: Option<SortSpec>, column: Column) -> Option<SortDirection> {
        match current {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Ascending => Some(SortDirection::Descending),
                SortDirection::Descending => None,
            },
            _ => Some(SortDirection::Ascending),
        }
    }

    fn sort_marker(current: Option<SortSpec>, column: Column) -> &'static str {
        match current {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Ascending => " ▲",
                SortDirection::Descending => " ▼",
            },
            _ => "",
        }
    }

    fn render_row(
        row: &PatientRow,
        table: &UseStateHandle<PatientTable>,
        on_select: &Callback<i64>,
    ) -> Html {
        let patient_id = row.patient.id;
        let expanded = table.is_expanded(patient_id);

        let on_open_detail = {
            let on_select = on_select.clone();
            Callback::from(move |event: MouseEvent| {
                event.prevent_default();
                on_select.emit(patient_id);
            })
        };

        let on_toggle = {
            let table = table.clone();
            Callback::from(move |event: MouseEvent| {
                event.prevent_default();
                let mut next = (*table).clone();
                next.toggle_expanded(patient_id);
                table.set(next);
            })
        };

        let notes_cell = if row.notes.is_empty() {
            html! {}
        } else if expanded {
            html! { <a href="#" onclick={on_toggle}>{"Ẩn ghi chú ▾"}</a> }
        } else {
            html! { <a href="#" onclick={on_toggle}>{"Xem ghi chú ▸"}</a> }
        };

        html! {
            <>
                <tr>
                    <td>
                        <a href="#" class="patient-link" onclick={on_open_detail}>
                            { row.patient.name.clone() }
                        </a>
                    </td>
                    <td>{ row.patient.gender.clone() }</td>
                    <td>{ format_date(row.patient.date_of_birth) }</td>
                    <td>{ notes_cell }</td>
                </tr>
                {
                    if expanded {
                        html! {
                            <tr class="note-row">
                                <td colspan="4">
                                    <ul class="note-list">
                                        {
                                            for table
                                                .matching_notes(row)
                                                .into_iter()
                                                .map(render_note)
                                        }
                                    </ul>
                                </td>
                            </tr>
                        }
                    } else {
                        html! {}
                    }
                }
            </>
        }
    }

    fn render_note(note: &Note) -> Html {
        html! {
            <li class="note-item">
                {
                    note.creation_date
                        .map(|timestamp| html! {
                            <div class="note-time">{ format_timestamp(Some(timestamp)) }</div>
                        })
                        .unwrap_or_default()
                }
                <div class="note-meta">
                    <span class="note-provider">
                        <b>{"Bác sĩ: "}</b>
                        { note.provider_name.clone().unwrap_or_default() }
                    </span>
                    <span class="note-hospital">
                        <b>{"Bệnh viện: "}</b>
                        { note.hospital_name.clone().unwrap_or_default() }
                    </span>
                </div>
                <p class="note-text">{ note.text.clone().unwrap_or_default() }</p>
            </li>
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct PatientDetailProps {
        pub row: PatientRow,
        pub on_back: Callback<MouseEvent>,
    }

    /// Trang chi tiết: thông tin hành chính và toàn bộ ghi chú của bệnh nhân.
    #[function_component(PatientDetail)]
    fn patient_detail(props: &PatientDetailProps) -> Html {
        let row = &props.row;

        html! {
            <div class="roster-root detail-root">
                <a href="#" class="back-link" onclick={props.on_back.clone()}>
                    {"← Quay lại danh sách"}
                </a>
                <h2>{ row.patient.name.clone() }</h2>
                <div class="detail-field">
                    <b>{"Giới tính: "}</b>
                    { row.patient.gender.clone() }
                </div>
                <div class="detail-field">
                    <b>{"Ngày sinh: "}</b>
                    { format_date(row.patient.date_of_birth) }
                </div>
                <section class="detail-notes">
                    <h3>{"Ghi chú"}</h3>
                    {
                        if row.notes.is_empty() {
                            html! {
                                <p class="detail-empty">{"Không có ghi chú cho bệnh nhân này."}</p>
                            }
                        } else {
                            html! {
                                <ul class="note-list">
                                    { for row.notes.iter().map(render_detail_note) }
                                </ul>
                            }
                        }
                    }
                </section>
            </div>
        }
    }

    fn render_detail_note(note: &Note) -> Html {
        html! {
            <li class="note-item">
                <div class="note-meta">
                    <span><b>{"Mã ghi chú: "}</b>{ note.id }</span>
                    <span class="note-time">{ format_timestamp(note.creation_date) }</span>
                </div>
                <div class="note-meta">
                    <span class="note-provider">
                        <b>{"Bác sĩ: "}</b>
                        { note.provider_name.clone().unwrap_or_default() }
                    </span>
                    <span class="note-hospital">
                        <b>{"Bệnh viện: "}</b>
                        { note.hospital_name.clone().unwrap_or_default() }
                    </span>
                </div>
                <p class="note-text">{ note.text.clone().unwrap_or_default() }</p>
            </li>
        }
    }

    fn render_not_found(on_back: Callback<MouseEvent>) -> Html {
        html! {
            <div class="roster-root detail-root">
                <h2>{"Không tìm thấy bệnh nhân"}</h2>
                <p>{"Hồ sơ được yêu cầu không tồn tại trong bộ dữ liệu."}</p>
                <a href="#" class="back-link" onclick={on_back}>{"← Quay lại danh sách"}</a>
            </div>
        }
    }

    fn selected_values(select: &HtmlSelectElement) -> Vec<String> {
        let options = select.selected_options();
        (0..options.length())
            .filter_map(|index| options.item(index))
            .filter_map(|element| element.dyn_into::<HtmlOptionElement>().ok())
            .map(|option| option.value())
            .collect()
    }

    fn format_date(date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }

    fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
        timestamp
            .map(|instant| instant.format("%d/%m/%Y %H:%M").to_string())
            .unwrap_or_else(|| "--".to_string())
    }

    #[wasm_bindgen]
    pub fn mount_patient_roster(
        selector: &str,
        patients: JsValue,
        notes: JsValue,
    ) -> Result<(), JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let patients: Vec<Patient> = from_value(patients).map_err(|err| {
            JsValue::from_str(&format!("Không đọc được danh sách bệnh nhân: {err}"))
        })?;
        let notes: Vec<Note> = from_value(notes).map_err(|err| {
            JsValue::from_str(&format!("Không đọc được danh sách ghi chú: {err}"))
        })?;

        let rows = assemble_rows(&patients, &notes);

        yew::Renderer::<RosterApp>::with_root_and_props(target, RosterAppProps { rows }).render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_patient_roster;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_patient_roster(
    _: &str,
    _: wasm_bindgen::JsValue,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "roster-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
