use courier_domain::pagination::PageRequest;
use sea_orm::{EntityTrait, QuerySelect, Select};

pub trait ApplyPage {
    /// Restrict the query to one page (`OFFSET`/`LIMIT` from the clamped request).
    fn apply_page(self, page: PageRequest) -> Self;
}

impl<E> ApplyPage for Select<E>
where
    E: EntityTrait,
{
    fn apply_page(self, page: PageRequest) -> Self {
        self.offset(page.offset()).limit(page.limit())
    }
}
