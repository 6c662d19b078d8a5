use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use roster_core::{Column, ColumnFilter, NoteFilter, PatientTable, SortDirection};
use roster_data::{find_patient, load_dataset_str};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "roster-cli",
    about = "Tra cứu bệnh nhân và ghi chú từ hai file JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON danh sách bệnh nhân.
    #[arg(long)]
    patients: PathBuf,
    /// Đường dẫn tới file JSON danh sách ghi chú.
    #[arg(long)]
    notes: PathBuf,
    /// Xem chi tiết một bệnh nhân theo id thay vì in bảng.
    #[arg(long)]
    patient: Option<i64>,
    /// Lọc theo tên (khớp chuỗi con).
    #[arg(long)]
    name: Option<String>,
    /// Lọc theo bác sĩ viết ghi chú (lặp lại được).
    #[arg(long)]
    provider: Vec<String>,
    /// Lọc theo nội dung ghi chú.
    #[arg(long)]
    text: Option<String>,
    /// Cột sắp xếp: name hoặc dob.
    #[arg(long)]
    sort: Option<String>,
    /// Sắp xếp giảm dần thay vì tăng dần.
    #[arg(long)]
    descending: bool,
    /// Trang muốn xem, bắt đầu từ 1.
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Cỡ trang hiển thị.
    #[arg(long, default_value_t = 10)]
    page_size: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let patients = std::fs::read_to_string(&args.patients)
        .with_context(|| format!("Không đọc được file {:?}", args.patients))?;
    let notes = std::fs::read_to_string(&args.notes)
        .with_context(|| format!("Không đọc được file {:?}", args.notes))?;

    let rows = load_dataset_str(&patients, &notes)?;

    if let Some(patient_id) = args.patient {
        let row = find_patient(&rows, Some(patient_id))?;
        println!(
            "{} ({}, sinh {})",
            row.patient.name, row.patient.gender, row.patient.date_of_birth
        );
        if row.notes.is_empty() {
            println!("Không có ghi chú.");
        }
        for note in &row.notes {
            let time = note
                .creation_date
                .map(|instant| instant.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "--".to_string());
            println!(
                "- [{time}] {} | {} | {}",
                note.provider_name.as_deref().unwrap_or("?"),
                note.hospital_name.as_deref().unwrap_or("?"),
                note.text.as_deref().unwrap_or("")
            );
        }
        return Ok(());
    }

    let mut table = PatientTable::new(rows);

    if let Some(name) = args.name {
        table.set_column_filter(ColumnFilter::Name(name));
    }
    if !args.provider.is_empty() || args.text.is_some() {
        table.set_column_filter(ColumnFilter::Notes(NoteFilter {
            provider_name: args.provider,
            text: args.text.unwrap_or_default(),
            ..NoteFilter::default()
        }));
    }
    match args.sort.as_deref() {
        Some("name") => table.set_sort(Column::Name, Some(direction(args.descending))),
        Some("dob") => table.set_sort(Column::DateOfBirth, Some(direction(args.descending))),
        Some(other) => anyhow::bail!("Cột sắp xếp không hỗ trợ: {other}"),
        None => {}
    }
    table.set_page_size(args.page_size);
    table.set_page_index(args.page.saturating_sub(1));

    for row in table.visible_rows() {
        println!(
            "{:>4}  {:<28} {:<4} {}  ({} ghi chú)",
            row.patient.id,
            row.patient.name,
            row.patient.gender,
            row.patient.date_of_birth,
            row.notes.len()
        );
    }
    println!(
        "Trang {}/{} ({} dòng khớp bộ lọc)",
        table.page_index() + 1,
        table.page_count().max(1),
        table.row_count()
    );

    Ok(())
}

fn direction(descending: bool) -> SortDirection {
    if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}
