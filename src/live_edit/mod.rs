use std::io::stdout;

use crossterm::{execute, terminal};
use crossterm::cursor::{MoveTo, MoveToColumn};
use crossterm::event::{Event, KeyCode, read};
use crossterm::style::{self, Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::info;

use crate::chart::format_amount;
use crate::db::Ledger;
use crate::transaction::Transaction;

const STATUS_LINE: &str = "j/k: move   d: delete   q: quit";
const DESCRIPTION_WIDTH: usize = 40;

/// Full screen list of transactions. Records can be deleted from here.
/// It takes the ids of the last query results so deleted records disappear from the ledger too.
pub(crate) fn browse(ids: Vec<u32>, ledger: &mut Ledger) -> anyhow::Result<()> {
    let mut transactions: Vec<Transaction> = ids.iter().filter_map(|id| ledger.find_by_id(*id)).collect();
    if transactions.is_empty() {
        info!("No records to browse");
        return Ok(());
    }

    execute!(stdout(), EnterAlternateScreen, MoveTo(0, 0))?;
    terminal::enable_raw_mode()?;
    let result = browse_loop(&mut transactions, ledger);
    terminal::disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    let deleted = result?;
    if deleted > 0 {
        info!("{deleted} records deleted.");
    }
    Ok(())
}

/// Returns the number of deleted records
fn browse_loop(transactions: &mut Vec<Transaction>, ledger: &mut Ledger) -> anyhow::Result<usize> {
    let (_columns, rows) = terminal::size()?;
    // last terminal line is the status line
    let mut window = Window::new(rows.saturating_sub(1).max(1), transactions.len());
    let mut deleted = 0;

    repaint_all(&window, transactions)?;
    loop {
        let event = match read()? {
            Event::Key(event) => event,
            _ => continue,
        };
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('j') | KeyCode::Down => {
                let delta = window.move_down();
                repaint_window(delta, transactions, window.selected_row)?;
            },
            KeyCode::Char('k') | KeyCode::Up => {
                let delta = window.move_up();
                repaint_window(delta, transactions, window.selected_row)?;
            },
            KeyCode::Char('d') => {
                let index = match window.selected_transaction_index() {
                    Some(i) => i,
                    None => continue,
                };
                let id = transactions[index].id;
                print_status(&window, &format!("Delete record {id}? (y/n)"))?;
                if confirmed()? {
                    deleted += ledger.delete(&[id])?;
                    transactions.remove(index);
                    window.remove_selected();
                    if transactions.is_empty() {
                        break;
                    }
                }
                repaint_all(&window, transactions)?;
            },
            _ => {}
        }
    }

    Ok(deleted)
}

/// Wait for the next key, true when it is 'y'
fn confirmed() -> anyhow::Result<bool> {
    loop {
        if let Event::Key(event) = read()? {
            return Ok(matches!(event.code, KeyCode::Char('y') | KeyCode::Char('Y')));
        }
    }
}

/// Scrolling state of the visible part of a list.
/// Moves return the rows to repaint as (screen row, list index, highlighted).
struct Window {
    /// Number of rows in this window
    rows: u16,

    /// Number of total transactions
    transactions_count: usize,

    /// Scrolling offset
    offset: usize,

    /// The row that is selected. 0 <= selected_row < rows
    selected_row: u16,
}

impl Window {
    fn new(rows: u16, transactions_count: usize) -> Window {
        Window { rows: rows.max(1), transactions_count, offset: 0, selected_row: 0 }
    }

    fn selected_transaction_index(&self) -> Option<usize> {
        let index = self.offset + self.selected_row as usize;
        if index < self.transactions_count { Some(index) } else { None }
    }

    /// Every visible row
    fn repaint(&self) -> Vec<(u16, usize, bool)> {
        let remaining = self.transactions_count.saturating_sub(self.offset);
        let visible = remaining.min(self.rows as usize);
        (0..visible)
            .map(|i| (i as u16, self.offset + i, i as u16 == self.selected_row))
            .collect()
    }

    fn move_down(&mut self) -> Vec<(u16, usize, bool)> {
        if self.offset + self.selected_row as usize + 1 >= self.transactions_count {
            return vec![];
        }

        if self.selected_row < self.rows - 1 {
            let mut delta = vec![];
            delta.push((self.selected_row, self.offset + self.selected_row as usize, false));
            self.selected_row += 1;
            delta.push((self.selected_row, self.offset + self.selected_row as usize, true));
            delta
        } else {
            self.scroll_up()
        }
    }

    fn scroll_up(&mut self) -> Vec<(u16, usize, bool)> {
        if self.offset + self.rows as usize >= self.transactions_count {
            return vec![];
        }

        self.offset += 1;
        let mut delta = vec![];
        for i in 0..self.rows - 1 {
            delta.push((i, self.offset + i as usize, false));
        }
        delta.push((self.rows - 1, self.offset + self.rows as usize - 1, true));
        delta
    }

    fn move_up(&mut self) -> Vec<(u16, usize, bool)> {
        if self.offset + self.selected_row as usize == 0 {
            return vec![];
        }

        if self.selected_row > 0 {
            let mut delta = vec![];
            delta.push((self.selected_row, self.offset + self.selected_row as usize, false));
            self.selected_row -= 1;
            delta.push((self.selected_row, self.offset + self.selected_row as usize, true));
            delta
        } else {
            self.scroll_down()
        }
    }

    fn scroll_down(&mut self) -> Vec<(u16, usize, bool)> {
        if self.offset == 0 {
            return vec![];
        }

        self.offset -= 1;
        let mut delta = vec![(0, self.offset, true)];
        for i in 1..self.rows {
            delta.push((i, self.offset + i as usize, false));
        }
        delta
    }

    /// The selected transaction was removed from the list.
    /// Selection stays on the same screen row unless the list got too short.
    fn remove_selected(&mut self) {
        if self.transactions_count == 0 {
            return;
        }
        self.transactions_count -= 1;
        if self.transactions_count == 0 {
            self.offset = 0;
            self.selected_row = 0;
            return;
        }

        if self.offset + self.selected_row as usize >= self.transactions_count {
            if self.selected_row > 0 {
                self.selected_row -= 1;
            } else {
                self.offset -= 1;
            }
        }
        // pull rows back in from the top rather than leave the bottom empty
        while self.offset > 0 && self.offset + self.rows as usize > self.transactions_count {
            self.offset -= 1;
            self.selected_row += 1;
        }
    }
}

fn repaint_all(window: &Window, transactions: &[Transaction]) -> anyhow::Result<()> {
    execute!(stdout(), terminal::Clear(ClearType::All))?;
    repaint_window(window.repaint(), transactions, window.selected_row)?;
    print_status(window, STATUS_LINE)
}

fn repaint_window(delta: Vec<(u16, usize, bool)>, transactions: &[Transaction], selected_row: u16) -> anyhow::Result<()> {
    for (row, trans_index, highlight) in delta {
        execute!(stdout(), MoveTo(0, row), terminal::Clear(ClearType::CurrentLine))?;
        print_transaction(&transactions[trans_index], highlight)?;
    }
    execute!(stdout(), MoveTo(0, selected_row))?;
    Ok(())
}

fn print_status(window: &Window, message: &str) -> anyhow::Result<()> {
    execute!(
        stdout(),
        MoveTo(0, window.rows),
        terminal::Clear(ClearType::CurrentLine),
        style::Print(message),
        MoveTo(0, window.selected_row),
    )?;
    Ok(())
}

/// Print a single transaction, in current terminal line
fn print_transaction(t: &Transaction, highlight: bool) -> anyhow::Result<()> {
    if highlight {
        execute!(stdout(), SetForegroundColor(Color::Black), SetBackgroundColor(Color::White))?;
    }
    execute!(stdout(), style::Print(format_row(t)), MoveToColumn(0))?;
    if highlight {
        execute!(stdout(), ResetColor)?;
    }
    Ok(())
}

fn format_row(t: &Transaction) -> String {
    let desc = if t.description.chars().count() > DESCRIPTION_WIDTH {
        let mut cut_down_version: String = t.description.chars().take(DESCRIPTION_WIDTH - 1).collect();
        cut_down_version.push('…');
        cut_down_version
    } else {
        t.description.clone()
    };
    format!(
        "| {:4} | {} | {:7} | {:14} | {:>10} | {:40} |",
        t.id, t.date_display(), t.kind.to_string(), t.category, format_amount(t.signed_amount()), desc,
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::live_edit::{format_row, Window};
    use crate::transaction::{Kind, Transaction};

    #[test]
    fn test_empty_window() {
        let mut window = Window::new(5, 0);
        assert!(window.repaint().is_empty());
        assert!(window.move_down().is_empty());
        assert!(window.move_up().is_empty());
        assert_eq!(window.selected_transaction_index(), None);
        window.remove_selected();
        assert_eq!(window.selected_transaction_index(), None);
    }

    #[test]
    fn test_scrolling() {
        let mut window = Window::new(3, 5);
        assert_eq!(window.repaint(), vec![(0, 0, true), (1, 1, false), (2, 2, false)]);
        assert!(window.move_up().is_empty());

        assert_eq!(window.move_down(), vec![(0, 0, false), (1, 1, true)]);
        window.move_down();
        // at the bottom row, the window scrolls
        assert_eq!(window.move_down(), vec![(0, 1, false), (1, 2, false), (2, 3, true)]);
        window.move_down();
        assert_eq!(window.selected_transaction_index(), Some(4));
        assert!(window.move_down().is_empty());

        window.move_up();
        window.move_up();
        assert_eq!(window.move_up(), vec![(0, 1, true), (1, 2, false), (2, 3, false)]);
        assert_eq!(window.selected_transaction_index(), Some(1));
    }

    #[test]
    fn test_short_list() {
        let mut window = Window::new(10, 2);
        assert_eq!(window.repaint().len(), 2);
        window.move_down();
        assert!(window.move_down().is_empty());
        assert_eq!(window.selected_transaction_index(), Some(1));
    }

    #[test]
    fn test_remove_selected() {
        let mut window = Window::new(3, 5);
        for _ in 0..4 {
            window.move_down();
        }
        assert_eq!((window.offset, window.selected_row), (2, 2));

        // last item removed, selection moves up
        window.remove_selected();
        assert_eq!(window.selected_transaction_index(), Some(3));
        assert_eq!(window.repaint(), vec![(0, 1, false), (1, 2, false), (2, 3, true)]);

        window.move_up();
        window.move_up();
        window.remove_selected();
        assert_eq!(window.selected_transaction_index(), Some(1));
        assert_eq!(window.repaint(), vec![(0, 0, false), (1, 1, true), (2, 2, false)]);

        window.remove_selected();
        window.remove_selected();
        window.remove_selected();
        assert_eq!(window.selected_transaction_index(), None);
        assert!(window.repaint().is_empty());
    }

    #[test]
    fn test_format_row() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(8, 30, 0).unwrap();
        let t = Transaction::new(12, date, Kind::Expense, "Food", 4.5, &"é".repeat(60));
        let row = format_row(&t);
        assert!(row.starts_with("|   12 | 2024-01-02 08:30:00 | Expense | Food "));
        assert!(row.contains("-4.50"));
        assert!(row.contains('…'));
    }
}
