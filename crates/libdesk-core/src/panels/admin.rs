//! Administrator panels: catalogue, lending, statistics and recommendation review.

use crate::api::Request;
use crate::dispatch::{Liveness, TriggerControl};
use crate::models::{Book, BorrowRecord, CategoryStat, Recommendation};
use crate::tabs::{PanelContext, PanelKind};

use super::records::{list_panel, submit_action, ListPanel, RecordList};

const BOOKS_URI: &str = "library/admin/books";
const DELETE_BOOK_URI: &str = "library/admin/books/delete";
const BORROWS_URI: &str = "library/admin/borrows";
const FORCE_RETURN_URI: &str = "library/admin/borrows/return";
const STATISTICS_URI: &str = "library/admin/statistics/book-categories";
const RECOMMENDATIONS_URI: &str = "library/admin/recommendations";
const REVIEW_URI: &str = "library/admin/recommendations/review";

// ============================================================================
// Catalogue management
// ============================================================================

#[derive(Debug, Default)]
pub struct ManagementPanel {
    records: RecordList<Book>,
    delete_control: TriggerControl,
    liveness: Liveness,
}

impl ManagementPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delete_selected(&self, ctx: &PanelContext) -> bool {
        let Some(book_id) = self.records.selected().and_then(|b| b.id) else {
            return false;
        };
        submit_action::<ManagementPanel>(
            ctx,
            PanelKind::Management,
            self.liveness.token(),
            &self.delete_control,
            Request::new(DELETE_BOOK_URI).param("bookId", book_id),
        )
    }
}

impl ListPanel for ManagementPanel {
    type Row = Book;

    fn records(&self) -> &RecordList<Book> {
        &self.records
    }

    fn records_mut(&mut self) -> &mut RecordList<Book> {
        &mut self.records
    }

    fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    fn load_request(&self, _ctx: &PanelContext) -> Request {
        Request::new(BOOKS_URI)
    }
}

list_panel!(ManagementPanel, PanelKind::Management);

// ============================================================================
// Lending administration
// ============================================================================

#[derive(Debug, Default)]
pub struct BorrowAdminPanel {
    records: RecordList<BorrowRecord>,
    return_control: TriggerControl,
    liveness: Liveness,
}

impl BorrowAdminPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a book back in on the borrower's behalf.
    pub fn force_return_selected(&self, ctx: &PanelContext) -> bool {
        let Some(record) = self.records.selected().filter(|r| !r.is_returned()) else {
            return false;
        };
        let Some(borrow_id) = record.borrow_id else {
            return false;
        };
        submit_action::<BorrowAdminPanel>(
            ctx,
            PanelKind::BorrowAdmin,
            self.liveness.token(),
            &self.return_control,
            Request::new(FORCE_RETURN_URI).param("borrowId", borrow_id),
        )
    }
}

impl ListPanel for BorrowAdminPanel {
    type Row = BorrowRecord;

    fn records(&self) -> &RecordList<BorrowRecord> {
        &self.records
    }

    fn records_mut(&mut self) -> &mut RecordList<BorrowRecord> {
        &mut self.records
    }

    fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    fn load_request(&self, _ctx: &PanelContext) -> Request {
        Request::new(BORROWS_URI)
    }
}

list_panel!(BorrowAdminPanel, PanelKind::BorrowAdmin);

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Default)]
pub struct StatisticsPanel {
    records: RecordList<CategoryStat>,
    liveness: Liveness,
}

impl StatisticsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// (books, borrows) summed over every category.
    pub fn totals(&self) -> (i64, i64) {
        self.records.rows().iter().fold((0, 0), |(books, borrows), stat| {
            (
                books + stat.book_count.unwrap_or(0),
                borrows + stat.borrow_count.unwrap_or(0),
            )
        })
    }
}

impl ListPanel for StatisticsPanel {
    type Row = CategoryStat;

    fn records(&self) -> &RecordList<CategoryStat> {
        &self.records
    }

    fn records_mut(&mut self) -> &mut RecordList<CategoryStat> {
        &mut self.records
    }

    fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    fn load_request(&self, _ctx: &PanelContext) -> Request {
        Request::new(STATISTICS_URI)
    }
}

list_panel!(StatisticsPanel, PanelKind::Statistics);

// ============================================================================
// Recommendation review
// ============================================================================

#[derive(Debug, Default)]
pub struct RecommendationAdminPanel {
    records: RecordList<Recommendation>,
    review_control: TriggerControl,
    liveness: Liveness,
}

impl RecommendationAdminPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Approve or reject the selected suggestion. Only pending ones can be
    /// reviewed.
    pub fn review_selected(&self, ctx: &PanelContext, approve: bool) -> bool {
        let Some(id) = self
            .records
            .selected()
            .filter(|r| r.is_pending())
            .and_then(|r| r.id)
        else {
            return false;
        };
        let decision = if approve { "APPROVED" } else { "REJECTED" };
        submit_action::<RecommendationAdminPanel>(
            ctx,
            PanelKind::RecommendationAdmin,
            self.liveness.token(),
            &self.review_control,
            Request::new(REVIEW_URI).param("id", id).param("decision", decision),
        )
    }
}

impl ListPanel for RecommendationAdminPanel {
    type Row = Recommendation;

    fn records(&self) -> &RecordList<Recommendation> {
        &self.records
    }

    fn records_mut(&mut self) -> &mut RecordList<Recommendation> {
        &mut self.records
    }

    fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    fn load_request(&self, _ctx: &PanelContext) -> Request {
        Request::new(RECOMMENDATIONS_URI)
    }
}

list_panel!(RecommendationAdminPanel, PanelKind::RecommendationAdmin);
