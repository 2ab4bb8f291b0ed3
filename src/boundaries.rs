//! Where a page's intro ends and its content ends. The markup does not say,
//! so the numbers come from an injected resolver.

use std::io::{BufRead, Write};
use std::ops::Range;

use crate::error::{MigrateError, Result};
use crate::guide::GuidePage;

/// Section cut points for one page, counted in top-level `<section>`s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boundaries {
    pub intro: usize,
    pub content: usize,
}

impl Boundaries {
    pub fn new(intro: usize, content: usize) -> Self {
        Self { intro, content }
    }

    /// Sections feeding the intro field.
    pub fn intro_range(&self, total: usize) -> Range<usize> {
        0..self.intro.min(total)
    }

    /// Sections feeding the page body. With an intro the body is
    /// `intro..content`; without one, `content` counts one trailing
    /// section past the body; zero or one means everything.
    pub fn content_range(&self, total: usize) -> Range<usize> {
        let (start, end) = if self.intro > 0 {
            (self.intro, self.content)
        } else if self.content > 1 {
            (0, self.content - 1)
        } else {
            (0, total)
        };
        let end = end.min(total);
        start.min(end)..end
    }
}

pub trait BoundaryResolver {
    fn resolve(&mut self, page: &GuidePage) -> Result<Boundaries>;
}

/// Same cut points for every page.
#[derive(Debug, Clone, Copy)]
pub struct FixedBoundaries(pub Boundaries);

impl BoundaryResolver for FixedBoundaries {
    fn resolve(&mut self, _page: &GuidePage) -> Result<Boundaries> {
        Ok(self.0)
    }
}

/// Asks the operator for both counts. Unparsable answers count as zero.
pub struct PromptBoundaries<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptBoundaries<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<usize> {
        write!(self.output, "{question} ").map_err(|e| MigrateError::io("<stdout>", e))?;
        self.output
            .flush()
            .map_err(|e| MigrateError::io("<stdout>", e))?;
        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .map_err(|e| MigrateError::io("<stdin>", e))?;
        Ok(answer.trim().parse().unwrap_or(0))
    }
}

impl PromptBoundaries<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> BoundaryResolver for PromptBoundaries<R, W> {
    fn resolve(&mut self, page: &GuidePage) -> Result<Boundaries> {
        let intro = self.ask(&format!(
            "Count the number of sections in the intro of \"{}\"?",
            page.slug
        ))?;
        let content = self.ask(&format!(
            "Count the number of sections in the content of \"{}\"?",
            page.slug
        ))?;
        Ok(Boundaries::new(intro, content))
    }
}
