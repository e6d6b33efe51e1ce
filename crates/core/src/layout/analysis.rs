//! Hook for an external layout analysis pass.
//!
//! Paragraph and column grouping is not performed here. A caller that wants
//! text lines, boxes or groups supplies a [`PageAnalyzer`]; the layout builder
//! invokes it on each finished page before the page reaches its sink.

use super::elements::LTPage;
use super::params::LAParams;

/// Mutates a completed page in place, typically replacing characters with
/// text boxes and filling `LTPage::groups`.
pub trait PageAnalyzer {
    fn analyze(&self, page: &mut LTPage, laparams: &LAParams);
}

impl<F> PageAnalyzer for F
where
    F: Fn(&mut LTPage, &LAParams),
{
    fn analyze(&self, page: &mut LTPage, laparams: &LAParams) {
        self(page, laparams)
    }
}
