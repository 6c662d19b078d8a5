//! Logic lõi cho bảng tra cứu hồ sơ bệnh nhân: mô hình dữ liệu, bộ lọc,
//! sắp xếp và phân trang.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Hồ sơ một bệnh nhân trong bộ dữ liệu tĩnh. Bất biến sau khi nạp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub gender: String,
    /// Ngày sinh, dạng ISO `YYYY-MM-DD`.
    pub date_of_birth: NaiveDate,
}

/// Ghi chú lâm sàng thuộc về đúng một bệnh nhân.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: i64,
    pub patient_id: i64,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    /// Thời điểm viết ghi chú; chấp nhận cả dạng chỉ có ngày.
    #[serde(default, deserialize_with = "deserialize_instant")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Một dòng trên bảng: bệnh nhân kèm toàn bộ ghi chú của họ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRow {
    #[serde(flatten)]
    pub patient: Patient,
    #[serde(default)]
    pub notes: Vec<Note>,
}

fn deserialize_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_instant(text).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("chuỗi thời gian không hợp lệ: {text}"))
        }),
    }
}

/// Đọc một mốc thời gian ISO 8601, RFC 3339 trước rồi tới dạng chỉ có ngày.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(day_start)
}

/// Nửa đêm UTC của một ngày, mốc so sánh chung cho mọi phép lọc theo ngày.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Ghép danh sách bệnh nhân với ghi chú theo khóa ngoại `patient_id`,
/// giữ nguyên thứ tự đầu vào ở cả hai cấp. Ghi chú mồ côi bị bỏ qua.
pub fn assemble_rows(patients: &[Patient], notes: &[Note]) -> Vec<PatientRow> {
    patients
        .iter()
        .map(|patient| PatientRow {
            patient: patient.clone(),
            notes: notes
                .iter()
                .filter(|note| note.patient_id == patient.id)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Khoảng ngày `[start, end]` giữ nguyên chuỗi người dùng nhập.
/// Đầu nào rỗng thì đầu đó để mở.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateBounds {
    pub start: String,
    pub end: String,
}

impl DateBounds {
    pub fn is_empty(&self) -> bool {
        self.start.trim().is_empty() && self.end.trim().is_empty()
    }
}

/// Một mốc thời gian có nằm trong khoảng lọc hay không, bao gồm cả hai biên.
///
/// Thiếu mốc thời gian thì luôn cho qua; biên khác rỗng mà không đọc được
/// thì ghi cảnh báo và loại dòng.
pub fn within_range(instant: Option<DateTime<Utc>>, bounds: &DateBounds) -> bool {
    let Some(instant) = instant else {
        return true;
    };
    if bounds.is_empty() {
        return true;
    }

    let start = match parse_bound(&bounds.start) {
        Ok(start) => start,
        Err(raw) => {
            tracing::warn!(bound = %raw, "biên lọc ngày không hợp lệ, loại dòng khỏi kết quả");
            return false;
        }
    };
    let end = match parse_bound(&bounds.end) {
        Ok(end) => end,
        Err(raw) => {
            tracing::warn!(bound = %raw, "biên lọc ngày không hợp lệ, loại dòng khỏi kết quả");
            return false;
        }
    };

    match (start, end) {
        (Some(start), Some(end)) => start <= instant && instant <= end,
        (Some(start), None) => instant >= start,
        (None, Some(end)) => instant <= end,
        (None, None) => true,
    }
}

fn parse_bound(raw: &str) -> Result<Option<DateTime<Utc>>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_instant(trimmed)
        .map(Some)
        .ok_or_else(|| trimmed.to_string())
}

/// Bộ lọc tổng hợp áp lên từng ghi chú. Trường rỗng nghĩa là bỏ tiêu chí đó.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteFilter {
    pub provider_name: Vec<String>,
    pub hospital_name: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub text: String,
}

impl NoteFilter {
    /// Bộ lọc rỗng hoàn toàn chấp nhận mọi ghi chú.
    pub fn is_default(&self) -> bool {
        self.provider_name.is_empty()
            && self.hospital_name.is_empty()
            && self.start_date.trim().is_empty()
            && self.end_date.trim().is_empty()
            && self.text.is_empty()
    }
}

/// Một ghi chú khớp bộ lọc khi thỏa đồng thời mọi tiêu chí đang bật.
///
/// Ghi chú thiếu trường nào thì tiêu chí trên trường đó cho qua.
/// Khoảng ngày chỉ được xét khi có đủ cả hai biên.
pub fn note_matches(note: &Note, filter: &NoteFilter) -> bool {
    let matches_text = if filter.text.is_empty() {
        true
    } else {
        match note.text.as_deref() {
            Some(text) if !text.is_empty() => {
                text.to_lowercase().contains(&filter.text.to_lowercase())
            }
            _ => true,
        }
    };

    let matches_provider = if filter.provider_name.is_empty() {
        true
    } else {
        match note.provider_name.as_deref() {
            Some(name) if !name.is_empty() => filter
                .provider_name
                .iter()
                .any(|candidate| candidate.to_lowercase() == name.to_lowercase()),
            _ => true,
        }
    };

    let matches_hospital = if filter.hospital_name.is_empty() {
        true
    } else {
        match note.hospital_name.as_deref() {
            Some(name) if !name.is_empty() => filter
                .hospital_name
                .iter()
                .any(|candidate| candidate.to_lowercase() == name.to_lowercase()),
            _ => true,
        }
    };

    let matches_date =
        if filter.start_date.trim().is_empty() || filter.end_date.trim().is_empty() {
            true
        } else {
            within_range(
                note.creation_date,
                &DateBounds {
                    start: filter.start_date.clone(),
                    end: filter.end_date.clone(),
                },
            )
        };

    matches_text && matches_provider && matches_hospital && matches_date
}

/// Trạng thái lọc của từng cột.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterState {
    pub name: String,
    pub gender: Vec<String>,
    pub date_of_birth: DateBounds,
    pub notes: NoteFilter,
}

/// Các cột của bảng tra cứu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Name,
    Gender,
    DateOfBirth,
    Notes,
}

impl Column {
    /// Chỉ tên và ngày sinh sắp xếp được.
    pub fn sortable(self) -> bool {
        matches!(self, Column::Name | Column::DateOfBirth)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Khóa sắp xếp đang bật.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

/// Giá trị lọc của một cột; mỗi cột một kiểu riêng.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    Name(String),
    Gender(Vec<String>),
    DateOfBirth(DateBounds),
    Notes(NoteFilter),
}

/// Các cỡ trang bảng cho phép chọn.
pub const PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];

/// Nguồn sự thật duy nhất cho phần dữ liệu đang hiển thị:
/// trạng thái lọc, sắp xếp, phân trang và mở rộng dòng.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientTable {
    rows: Vec<PatientRow>,
    filters: FilterState,
    sort: Option<SortSpec>,
    page_index: usize,
    page_size: usize,
    expanded: BTreeSet<i64>,
}

impl PatientTable {
    pub fn new(rows: Vec<PatientRow>) -> Self {
        Self {
            rows,
            filters: FilterState::default(),
            sort: None,
            page_index: 0,
            page_size: PAGE_SIZES[0],
            expanded: BTreeSet::new(),
        }
    }

    pub fn rows(&self) -> &[PatientRow] {
        &self.rows
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Thay giá trị lọc của đúng một cột. Sắp xếp và trạng thái mở rộng
    /// giữ nguyên; chỉ số trang được kẹp lại theo tập kết quả mới.
    pub fn set_column_filter(&mut self, filter: ColumnFilter) {
        match filter {
            ColumnFilter::Name(value) => self.filters.name = value,
            ColumnFilter::Gender(values) => self.filters.gender = values,
            ColumnFilter::DateOfBirth(bounds) => self.filters.date_of_birth = bounds,
            ColumnFilter::Notes(filter) => self.filters.notes = filter,
        }
        self.clamp_page_index();
    }

    /// Đưa mọi cột về trạng thái chấp nhận tất cả.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
        self.clamp_page_index();
    }

    /// Một khóa sắp xếp duy nhất: chọn cột mới thay cột cũ, `None` xóa
    /// sắp xếp. Cột không sắp xếp được thì bỏ qua.
    pub fn set_sort(&mut self, column: Column, direction: Option<SortDirection>) {
        if !column.sortable() {
            return;
        }
        self.sort = direction.map(|direction| SortSpec { column, direction });
    }

    pub fn set_page_index(&mut self, index: usize) {
        self.page_index = index.min(self.last_page_index());
    }

    /// Đổi cỡ trang luôn quay về trang đầu.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page_index = 0;
    }

    /// Bật/tắt danh sách ghi chú của một dòng.
    /// Dòng không có ghi chú thì không mở được.
    pub fn toggle_expanded(&mut self, patient_id: i64) {
        let can_expand = self
            .rows
            .iter()
            .any(|row| row.patient.id == patient_id && !row.notes.is_empty());
        if !can_expand {
            return;
        }
        if !self.expanded.remove(&patient_id) {
            self.expanded.insert(patient_id);
        }
    }

    pub fn is_expanded(&self, patient_id: i64) -> bool {
        self.expanded.contains(&patient_id)
    }

    /// Lát cắt trang hiện tại của tập dòng đã lọc rồi sắp xếp.
    pub fn visible_rows(&self) -> Vec<&PatientRow> {
        self.sorted()
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// Số dòng sau khi lọc, trước khi phân trang.
    pub fn row_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn page_count(&self) -> usize {
        self.row_count().div_ceil(self.page_size)
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    /// Ghi chú của một dòng sau khi lọc lại bằng bộ lọc ghi chú hiện tại,
    /// đúng danh sách đã khiến dòng đó khớp.
    pub fn matching_notes<'a>(&self, row: &'a PatientRow) -> Vec<&'a Note> {
        row.notes
            .iter()
            .filter(|note| note_matches(note, &self.filters.notes))
            .collect()
    }

    fn row_passes(&self, row: &PatientRow) -> bool {
        if !self.filters.name.is_empty()
            && !row
                .patient
                .name
                .to_lowercase()
                .contains(&self.filters.name.to_lowercase())
        {
            return false;
        }

        if !self.filters.gender.is_empty()
            && !self
                .filters
                .gender
                .iter()
                .any(|gender| *gender == row.patient.gender)
        {
            return false;
        }

        if !within_range(
            Some(day_start(row.patient.date_of_birth)),
            &self.filters.date_of_birth,
        ) {
            return false;
        }

        // Cột ghi chú: chỉ cần một ghi chú thỏa toàn bộ tiêu chí.
        // Bộ lọc rỗng hoàn toàn không loại dòng nào, kể cả dòng không có ghi chú.
        if self.filters.notes.is_default() {
            return true;
        }
        row.notes
            .iter()
            .any(|note| note_matches(note, &self.filters.notes))
    }

    fn filtered(&self) -> Vec<&PatientRow> {
        self.rows.iter().filter(|row| self.row_passes(row)).collect()
    }

    fn sorted(&self) -> Vec<&PatientRow> {
        let mut rows = self.filtered();
        if let Some(sort) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = match sort.column {
                    Column::Name => a.patient.name.cmp(&b.patient.name),
                    Column::DateOfBirth => {
                        a.patient.date_of_birth.cmp(&b.patient.date_of_birth)
                    }
                    _ => Ordering::Equal,
                };
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    fn last_page_index(&self) -> usize {
        self.page_count().saturating_sub(1)
    }

    fn clamp_page_index(&mut self) {
        self.page_index = self.page_index.min(self.last_page_index());
    }
}

/// Các giá trị giới tính xuất hiện trong bộ dữ liệu, theo thứ tự gặp đầu tiên.
pub fn distinct_genders(rows: &[PatientRow]) -> Vec<String> {
    let mut values = Vec::new();
    for row in rows {
        if !row.patient.gender.is_empty() && !values.contains(&row.patient.gender) {
            values.push(row.patient.gender.clone());
        }
    }
    values
}

/// Các bác sĩ từng viết ghi chú, theo thứ tự gặp đầu tiên.
pub fn distinct_providers(rows: &[PatientRow]) -> Vec<String> {
    distinct_note_values(rows, |note| note.provider_name.as_deref())
}

/// Các bệnh viện từng xuất hiện trong ghi chú, theo thứ tự gặp đầu tiên.
pub fn distinct_hospitals(rows: &[PatientRow]) -> Vec<String> {
    distinct_note_values(rows, |note| note.hospital_name.as_deref())
}

fn distinct_note_values<F>(rows: &[PatientRow], field: F) -> Vec<String>
where
    F: Fn(&Note) -> Option<&str>,
{
    let mut values: Vec<String> = Vec::new();
    for row in rows {
        for note in &row.notes {
            if let Some(value) = field(note) {
                if !value.is_empty() && !values.iter().any(|seen| seen == value) {
                    values.push(value.to_string());
                }
            }
        }
    }
    values
}

/// Lỗi chung của bảng tra cứu.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Yêu cầu xem chi tiết thiếu id bệnh nhân")]
    MissingPatientId,
    #[error("Không tìm thấy bệnh nhân với id {0}")]
    PatientNotFound(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: i64, name: &str, gender: &str, dob: &str) -> Patient {
        Patient {
            id,
            name: name.to_string(),
            gender: gender.to_string(),
            date_of_birth: NaiveDate::parse_from_str(dob, "%Y-%m-%d").unwrap(),
        }
    }

    fn note(id: i64, patient_id: i64) -> Note {
        Note {
            id,
            patient_id,
            provider_name: None,
            hospital_name: None,
            creation_date: None,
            text: None,
        }
    }

    fn bounds(start: &str, end: &str) -> DateBounds {
        DateBounds {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    fn sample_table() -> PatientTable {
        let alice = patient(1, "Alice", "F", "1990-01-01");
        let bob = patient(2, "Bob", "M", "1985-05-05");
        let mut fever_note = note(1, 1);
        fever_note.provider_name = Some("Dr. Smith".to_string());
        fever_note.text = Some("fever".to_string());
        fever_note.creation_date = parse_instant("2020-01-01");
        let rows = assemble_rows(&[alice, bob], &[fever_note]);
        PatientTable::new(rows)
    }

    #[test]
    fn missing_instant_passes_any_bounds() {
        assert!(within_range(None, &bounds("1990-01-01", "2000-01-01")));
        assert!(within_range(None, &bounds("not-a-date", "")));
        assert!(within_range(parse_instant("1995-06-01"), &bounds("", "")));
    }

    #[test]
    fn range_is_inclusive_at_both_edges() {
        let range = bounds("1990-01-01", "1990-12-31");
        assert!(within_range(parse_instant("1990-01-01"), &range));
        assert!(within_range(parse_instant("1990-12-31"), &range));
        assert!(within_range(parse_instant("1990-06-15"), &range));
        assert!(!within_range(parse_instant("1989-12-31"), &range));
        assert!(!within_range(parse_instant("1991-01-01"), &range));
    }

    #[test]
    fn single_sided_bounds_apply_independently() {
        assert!(within_range(parse_instant("2001-01-01"), &bounds("2000-01-01", "")));
        assert!(!within_range(parse_instant("1999-01-01"), &bounds("2000-01-01", "")));
        assert!(within_range(parse_instant("1999-01-01"), &bounds("", "2000-01-01")));
        assert!(!within_range(parse_instant("2001-01-01"), &bounds("", "2000-01-01")));
    }

    #[test]
    fn invalid_bound_fails_closed() {
        assert!(!within_range(
            parse_instant("1995-06-01"),
            &bounds("not-a-date", "")
        ));
        assert!(!within_range(
            parse_instant("1995-06-01"),
            &bounds("1990-01-01", "cũng-không-phải-ngày")
        ));
    }

    #[test]
    fn note_filter_combines_criteria_with_and() {
        let mut fever = note(1, 1);
        fever.text = Some("Sốt cao về đêm".to_string());
        fever.provider_name = Some("BS. Hoa".to_string());

        let text_only = NoteFilter {
            text: "sốt".to_string(),
            ..NoteFilter::default()
        };
        assert!(note_matches(&fever, &text_only));

        let text_and_other_provider = NoteFilter {
            text: "sốt".to_string(),
            provider_name: vec!["BS. Minh".to_string()],
            ..NoteFilter::default()
        };
        assert!(!note_matches(&fever, &text_and_other_provider));
    }

    #[test]
    fn note_missing_field_passes_that_criterion() {
        let bare = note(1, 1);
        let filter = NoteFilter {
            provider_name: vec!["BS. Hoa".to_string()],
            text: "sốt".to_string(),
            ..NoteFilter::default()
        };
        assert!(note_matches(&bare, &filter));
    }

    #[test]
    fn note_date_range_needs_both_bounds() {
        let mut old_note = note(1, 1);
        old_note.creation_date = parse_instant("2010-01-01");

        let start_only = NoteFilter {
            start_date: "2020-01-01".to_string(),
            ..NoteFilter::default()
        };
        assert!(note_matches(&old_note, &start_only));

        let both = NoteFilter {
            start_date: "2020-01-01".to_string(),
            end_date: "2021-01-01".to_string(),
            ..NoteFilter::default()
        };
        assert!(!note_matches(&old_note, &both));
    }

    #[test]
    fn row_visible_when_any_note_matches() {
        let owner = patient(1, "An", "M", "1980-01-01");
        let other = patient(2, "Bình", "M", "1981-01-01");
        let mut matching = note(1, 1);
        matching.text = Some("đau đầu kéo dài".to_string());
        let mut missing = note(2, 1);
        missing.text = Some("tái khám định kỳ".to_string());
        let mut missing_too = note(3, 2);
        missing_too.text = Some("tái khám định kỳ".to_string());

        let rows = assemble_rows(&[owner, other], &[matching, missing, missing_too]);
        let mut table = PatientTable::new(rows);
        table.set_column_filter(ColumnFilter::Notes(NoteFilter {
            text: "đau đầu".to_string(),
            ..NoteFilter::default()
        }));

        let visible = table.visible_rows();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].patient.id, 1);
    }

    #[test]
    fn noteless_rows_follow_notes_filter_vacuity() {
        let mut table = sample_table();

        // Bộ lọc mặc định: cả Bob (không có ghi chú) đều hiển thị.
        assert_eq!(table.row_count(), 2);

        table.set_column_filter(ColumnFilter::Notes(NoteFilter {
            provider_name: vec!["Dr. Smith".to_string()],
            ..NoteFilter::default()
        }));
        let visible = table.visible_rows();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].patient.name, "Alice");
    }

    #[test]
    fn page_size_change_resets_index() {
        let patients: Vec<Patient> = (0..25)
            .map(|id| patient(id, &format!("Bệnh nhân {id}"), "F", "1990-01-01"))
            .collect();
        let rows = assemble_rows(&patients, &[]);
        let mut table = PatientTable::new(rows);

        table.set_page_index(2);
        assert_eq!(table.page_index(), 2);
        assert_eq!(table.page_count(), 3);

        table.set_page_size(50);
        assert_eq!(table.page_index(), 0);
        assert_eq!(table.page_count(), 1);
        assert_eq!(table.visible_rows().len(), 25);
        assert!(!table.can_previous_page());
        assert!(!table.can_next_page());
    }

    #[test]
    fn shrinking_filter_reclamps_page_index() {
        let patients: Vec<Patient> = (0..25)
            .map(|id| patient(id, &format!("Bệnh nhân {id}"), "F", "1990-01-01"))
            .collect();
        let rows = assemble_rows(&patients, &[]);
        let mut table = PatientTable::new(rows);

        table.set_page_index(2);
        table.set_column_filter(ColumnFilter::Name("Bệnh nhân 1".to_string()));
        // Còn 11 dòng khớp nên chỉ còn 2 trang.
        assert_eq!(table.row_count(), 11);
        assert_eq!(table.page_index(), 1);
    }

    #[test]
    fn sort_key_is_exclusive_and_notes_unsortable() {
        let mut table = sample_table();

        table.set_sort(Column::DateOfBirth, Some(SortDirection::Ascending));
        table.set_sort(Column::Name, Some(SortDirection::Descending));
        assert_eq!(
            table.sort(),
            Some(SortSpec {
                column: Column::Name,
                direction: SortDirection::Descending,
            })
        );

        table.set_sort(Column::Notes, Some(SortDirection::Ascending));
        assert_eq!(
            table.sort().map(|spec| spec.column),
            Some(Column::Name),
            "cột ghi chú không được thay khóa sắp xếp"
        );

        let visible = table.visible_rows();
        assert_eq!(visible[0].patient.name, "Bob");
        assert_eq!(visible[1].patient.name, "Alice");

        table.set_sort(Column::Name, None);
        assert_eq!(table.sort(), None);
    }

    #[test]
    fn sort_by_date_of_birth_is_chronological() {
        let mut table = sample_table();
        table.set_sort(Column::DateOfBirth, Some(SortDirection::Ascending));
        let visible = table.visible_rows();
        assert_eq!(visible[0].patient.name, "Bob");
        assert_eq!(visible[1].patient.name, "Alice");
    }

    #[test]
    fn assembly_joins_on_foreign_key_and_drops_orphans() {
        let patients = vec![
            patient(1, "An", "M", "1980-01-01"),
            patient(2, "Bình", "M", "1981-01-01"),
        ];
        let notes = vec![note(10, 1), note(11, 99)];

        let rows = assemble_rows(&patients, &notes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].notes.len(), 1);
        assert_eq!(rows[0].notes[0].id, 10);
        assert!(rows[1].notes.is_empty());
    }

    #[test]
    fn expansion_only_opens_rows_with_notes() {
        let mut table = sample_table();

        table.toggle_expanded(2);
        assert!(!table.is_expanded(2));

        table.toggle_expanded(1);
        assert!(table.is_expanded(1));
        table.toggle_expanded(1);
        assert!(!table.is_expanded(1));

        // Trạng thái mở rộng không đổi khi bộ lọc thay đổi.
        table.toggle_expanded(1);
        table.set_column_filter(ColumnFilter::Name("Bob".to_string()));
        assert!(table.is_expanded(1));
    }

    #[test]
    fn lookup_scenario_end_to_end() {
        let mut table = sample_table();

        table.set_column_filter(ColumnFilter::Name("ali".to_string()));
        let visible = table.visible_rows();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].patient.name, "Alice");

        table.reset_filters();
        let visible = table.visible_rows();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].patient.name, "Alice");
        assert_eq!(visible[1].patient.name, "Bob");

        table.set_column_filter(ColumnFilter::Notes(NoteFilter {
            provider_name: vec!["Dr. Smith".to_string()],
            ..NoteFilter::default()
        }));
        let visible = table.visible_rows();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].patient.id, 1);
    }

    #[test]
    fn matching_notes_refilters_for_display() {
        let owner = patient(1, "An", "M", "1980-01-01");
        let mut headache = note(1, 1);
        headache.text = Some("đau đầu kéo dài".to_string());
        let mut checkup = note(2, 1);
        checkup.text = Some("tái khám định kỳ".to_string());

        let rows = assemble_rows(&[owner], &[headache, checkup]);
        let mut table = PatientTable::new(rows);
        table.set_column_filter(ColumnFilter::Notes(NoteFilter {
            text: "đau đầu".to_string(),
            ..NoteFilter::default()
        }));

        let row = table.rows()[0].clone();
        let shown = table.matching_notes(&row);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, 1);
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let patients = vec![
            patient(1, "An", "M", "1980-01-01"),
            patient(2, "Bình", "F", "1981-01-01"),
            patient(3, "Chi", "M", "1982-01-01"),
        ];
        let mut first = note(1, 1);
        first.provider_name = Some("BS. Hoa".to_string());
        first.hospital_name = Some("Bệnh viện Bạch Mai".to_string());
        let mut second = note(2, 2);
        second.provider_name = Some("BS. Minh".to_string());
        second.hospital_name = Some("Bệnh viện Bạch Mai".to_string());
        let mut third = note(3, 3);
        third.provider_name = Some("BS. Hoa".to_string());

        let rows = assemble_rows(&patients, &[first, second, third]);
        assert_eq!(distinct_genders(&rows), vec!["M", "F"]);
        assert_eq!(distinct_providers(&rows), vec!["BS. Hoa", "BS. Minh"]);
        assert_eq!(distinct_hospitals(&rows), vec!["Bệnh viện Bạch Mai"]);
    }
}
