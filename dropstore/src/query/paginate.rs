use serde::Serialize;

/// Pagination metadata for one listing page.
///
/// `first_result`/`last_result` are 0-based inclusive positions into the
/// sorted result sequence. For an empty result both are 0 and
/// `results_on_page` is 0.
//
// // 单个列表页的分页元数据。
// // `first_result`/`last_result` 是排序结果序列中从 0 开始的闭区间位置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: usize,
    pub total_pages: usize,
    pub results_per_page: usize,
    pub current_page: usize,
    /// First page number of the link window around `current_page`.
    pub first_page: usize,
    /// Last page number of the link window; below `first_page` when there are no pages.
    pub last_page: usize,
    pub previous_page: Option<usize>,
    pub next_page: Option<usize>,
    pub first_result: usize,
    pub last_result: usize,
    pub results_on_page: usize,
}

impl PageInfo {
    /// Page numbers to offer as links.
    pub fn pages(&self) -> std::ops::RangeInclusive<usize> {
        self.first_page..=self.last_page
    }

    /// The slice bounds of this page within the sorted results.
    pub fn result_range(&self) -> std::ops::Range<usize> {
        if self.results_on_page == 0 {
            0..0
        } else {
            self.first_result..self.last_result + 1
        }
    }
}

/// Number of pages needed for `total` results.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1))
}

/// Builds the metadata for `requested` page, clamping it into `[1, total_pages]`.
/// `link_count` bounds the window of page links around the current page.
pub fn paginate(total: usize, per_page: usize, link_count: usize, requested: usize) -> PageInfo {
    let per_page = per_page.max(1);
    let pages = total_pages(total, per_page);
    let current = requested.clamp(1, pages.max(1));

    let (first_page, last_page) = if pages == 0 {
        (1, 0)
    } else {
        let links = link_count.max(1);
        let first = current.saturating_sub(links / 2).max(1);
        let last = (first + links - 1).min(pages);
        // 靠近末尾时向前补足窗口
        let first = (last + 1).saturating_sub(links).max(1);
        (first, last)
    };

    let (first_result, last_result, results_on_page) = if total == 0 {
        (0, 0, 0)
    } else {
        let first = (current - 1) * per_page;
        let last = (first + per_page).min(total) - 1;
        (first, last, last - first + 1)
    };

    PageInfo {
        total_results: total,
        total_pages: pages,
        results_per_page: per_page,
        current_page: current,
        first_page,
        last_page,
        previous_page: (current > 1).then(|| current - 1),
        next_page: (current < pages).then(|| current + 1),
        first_result,
        last_result,
        results_on_page,
    }
}

/// Metadata for an "all" listing: one page spanning the whole result set.
pub fn paginate_all(total: usize, per_page: usize) -> PageInfo {
    let pages = total_pages(total, per_page);
    PageInfo {
        total_results: total,
        total_pages: pages,
        results_per_page: per_page.max(1),
        current_page: 1,
        first_page: 1,
        last_page: pages,
        previous_page: None,
        next_page: None,
        first_result: 0,
        last_result: total.saturating_sub(1),
        results_on_page: total,
    }
}
