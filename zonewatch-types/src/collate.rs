//! Human-oriented string ordering for alarm reasons.

use core::cell::RefCell;
use core::cmp::Ordering;

use feruca::Collator;

thread_local! {
    static COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// Compare two strings the way a reader expects them listed.
///
/// Uses the Unicode Collation Algorithm with the CLDR root order: accents
/// and case only matter once the base letters tie (`"Écran" < "Zeus"`,
/// `"éclair" < "eclairage"`), and lowercase sorts before uppercase. Strings
/// that still tie are ordered by their bytes, so only identical strings
/// compare `Equal`.
pub fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| collator.borrow_mut().collate(a, b))
        .then_with(|| a.cmp(b))
}
