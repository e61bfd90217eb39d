//! Functions for printing store objects to the console.

use chrono::Local;
use dropstore::{ObjectRecord, PageInfo, UploadReceipt};

/// 把字节数格式化为便于阅读的大小
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// 打印上传回执
pub fn print_receipt(receipt: &UploadReceipt) {
    println!("Name:  {}", receipt.file_name);
    if let Some(url) = &receipt.url {
        println!("URL:   {}", url);
    }
    println!("Token: {}", receipt.token);
}

/// 打印列表中的单条记录
pub fn print_record_line(record: &ObjectRecord) {
    let modified = record.modified_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    // 格式: {名称} {类型} {大小} {修改时间}
    println!(
        "{:<24} {:<6} {:>10}  {}",
        record.name,
        record.media_kind.to_string(),
        human_size(record.size_bytes),
        modified
    );
}

/// 打印单个对象的详细信息
pub fn print_record_details(record: &ObjectRecord, url: Option<&str>) {
    println!("----------------------------------------");
    println!("{:<10} {}", "Name:", record.name);
    println!("{:<10} {}", "Kind:", record.media_kind);
    println!("{:<10} {}", "Size:", human_size(record.size_bytes));
    println!(
        "{:<10} {}",
        "Modified:",
        record.modified_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(url) = url {
        println!("{:<10} {}", "URL:", url);
    }
    if let Some(content) = &record.inline_content {
        println!("{:<10}", "Content:");
        println!("{}", content);
    }
    println!("----------------------------------------");
}

/// 打印分页信息
pub fn print_page_footer(page: &PageInfo) {
    if page.total_pages <= 1 {
        println!("{} object(s).", page.total_results);
        return;
    }
    let links: Vec<String> = page
        .pages()
        .map(|n| if n == page.current_page { format!("[{}]", n) } else { n.to_string() })
        .collect();
    println!(
        "Page {} of {} ({} object(s)): {}",
        page.current_page,
        page.total_pages,
        page.total_results,
        links.join(" ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1536), "1.5 KiB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
