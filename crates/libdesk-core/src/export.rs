//! Plain-text export of borrow history.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::info;

use crate::models::BorrowRecord;

pub const TITLE: &str = "借阅历史记录";
pub const HEADER: [&str; 7] = [
    "借阅ID",
    "图书ID",
    "书名",
    "作者",
    "借阅日期",
    "归还日期",
    "状态",
];

/// Write the export to any sink.
pub fn write_history<'a, W, I>(
    out: &mut W,
    user_name: &str,
    rows: I,
    exported_at: NaiveDateTime,
) -> std::io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a BorrowRecord>,
{
    writeln!(out, "{}", TITLE)?;
    writeln!(out, "导出时间: {}", exported_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "用户: {}", user_name)?;
    writeln!(out)?;
    writeln!(out, "{}", HEADER.join("\t"))?;

    let mut count = 0;
    for row in rows {
        let fields = row.export_fields().map(|f| sanitize(&f));
        writeln!(out, "{}", fields.join("\t"))?;
        count += 1;
    }

    writeln!(out)?;
    writeln!(out, "共 {} 条记录", count)?;
    Ok(count)
}

/// Tabs and line breaks inside a field would break the row layout.
fn sanitize(field: &str) -> String {
    field.replace(['\t', '\r', '\n'], " ")
}

/// File name for an export taken at `at`.
pub fn file_name(user_name: &str, at: NaiveDateTime) -> String {
    let user: String = user_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("borrow_history_{}_{}.txt", user, at.format("%Y%m%d_%H%M%S"))
}

/// Export into `dir`, creating it if needed. Returns the written path.
pub fn export_history<'a, I>(
    dir: &Path,
    user_name: &str,
    rows: I,
    exported_at: NaiveDateTime,
) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a BorrowRecord>,
{
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(file_name(user_name, exported_at));

    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let count = write_history(&mut out, user_name, rows, exported_at)
        .and_then(|count| out.flush().map(|_| count))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), rows = count, "Exported borrow history");
    Ok(path)
}
