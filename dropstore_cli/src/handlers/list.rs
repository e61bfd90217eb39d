use chrono::NaiveDate;
use dropstore::{DateRange, Mask, PageSelector, QueryRequest, Store};
use crate::errors::CliError;
use crate::ui::printer::{print_page_footer, print_record_line};

/// list 命令的筛选参数
#[derive(Debug, Default)]
pub struct ListOptions {
    pub page: String,
    pub glob: Option<String>,
    pub regex: Option<String>,
    pub extensions: Vec<String>,
    pub images: bool,
    pub since: Option<String>,
    pub until: Option<String>,
    pub max_size: Option<u64>,
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, CliError> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|_| CliError::InvalidDate(v.to_string()))
        })
        .transpose()
}

/// 根据命令行参数构建查询请求
pub fn build_request(store: &Store, options: &ListOptions) -> Result<QueryRequest, CliError> {
    let mut request = if options.images {
        QueryRequest::images(store.config())
    } else {
        store.query()
    };

    if let Some(glob) = &options.glob {
        request = request.with_mask(Mask::glob(glob)?);
    } else if let Some(regex) = &options.regex {
        request = request.with_mask(Mask::regex(regex)?);
    }
    if !options.extensions.is_empty() {
        request = request.with_extensions(options.extensions.iter().map(String::as_str));
    }
    if let Some(max_size) = options.max_size {
        request = request.with_max_size(max_size);
    }

    let since = parse_date(options.since.as_deref())?;
    let until = parse_date(options.until.as_deref())?;
    if since.is_some() || until.is_some() {
        request = request.with_dates(DateRange::through(since, until));
    }

    let page: PageSelector = options.page.parse()?;
    Ok(request.with_page(page))
}

/// 处理列表命令
pub fn handle_list(store: &Store, options: &ListOptions, json: bool) -> Result<(), CliError> {
    let request = build_request(store, options)?;
    let result = store.list(&request)?;

    if json {
        let body = serde_json::json!({
            "records": result.records,
            "page": result.page,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if result.records.is_empty() {
        println!("No objects found.");
    }
    for record in &result.records {
        print_record_line(record);
    }
    print_page_footer(&result.page);
    Ok(())
}
