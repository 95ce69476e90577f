use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        self,
        format::{Format, FormatEvent, FormatFields, Full, Writer},
        time::ChronoLocal,
        FmtContext,
    },
    registry::LookupSpan,
};

/// Time of day only, the log covers one dashboard session.
const TIME_FORMAT: &str = "%H:%M:%S";

/// Event formatter that indents each event by the depth of its span scope,
/// so a tab's events sit under the pass that loaded it:
///
/// ```text
/// 14:02:11  INFO load_all: Connecting to the spreadsheet service
///   └─14:02:12  INFO load_all:worksheet{worksheet="Products" index=0 len=6}: ✅ Products: 12 rows
/// ```
pub struct PrettyFormatter {
    inner: Format<Full, ChronoLocal>,
}

impl PrettyFormatter {
    pub fn new(ansi: bool) -> Self {
        Self {
            inner: fmt::format()
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_ansi(ansi)
                .with_target(false)
                .with_level(true)
                .with_file(false)
                .with_line_number(false),
        }
    }
}

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let depth = ctx.event_scope().map(|scope| scope.count()).unwrap_or(0);

        // Events of the outermost span stay flush left.
        for _ in 0..depth.saturating_sub(2) {
            write!(writer, "  ")?;
        }
        if depth > 1 {
            write!(writer, "└─")?;
        }

        self.inner.format_event(ctx, writer, event)
    }
}
