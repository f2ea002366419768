use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_wrap_config::Config;
use markdown_wrap_engine::{
    Cmd, ENTER, Edit, EditToken, LineIndex, Position, SelectionRange, Session,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

const TAB_WIDTH: usize = 4;

struct App {
    path: PathBuf,
    session: Session,
    /// Fixed end of a Shift selection.
    anchor: Option<Position>,
    /// Moving end of the selection, where the cursor is drawn.
    head: Position,
    /// Edit whose selection is applied after the next frame.
    pending: Option<EditToken>,
    scroll: usize,
    status: String,
}

impl App {
    fn new(path: PathBuf, config: &Config) -> Result<Self> {
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let session = config.open_session(&bytes)?;
        let head = session.selection().end;

        Ok(Self {
            path,
            session,
            anchor: None,
            head,
            pending: None,
            scroll: 0,
            status: String::new(),
        })
    }

    fn save(&mut self) {
        self.status = match fs::write(&self.path, self.session.to_bytes()) {
            Ok(()) => format!("Saved {}", self.path.display()),
            Err(e) => format!("Error saving {}: {e}", self.path.display()),
        };
    }

    fn commit_pending(&mut self) {
        let Some(token) = self.pending.take() else {
            return;
        };
        if self.session.apply_pending_selection(token) {
            let selection = self.session.selection();
            self.anchor = (!selection.is_empty()).then_some(selection.start);
            self.head = selection.end;
        }
    }

    fn run(&mut self, cmd: Cmd) {
        self.session.exec(&cmd);
        self.pending = self.session.pending_token();
    }

    fn edit(&mut self, edit: Edit) {
        self.pending = Some(self.session.apply_edit(edit).token);
    }

    fn insert(&mut self, text: &str) {
        let edit = Edit::replace(&self.session.text(), &self.session.selection(), text);
        self.edit(edit);
    }

    fn backspace(&mut self) {
        let text = self.session.text();
        let mut selection = self.session.selection();
        if selection.is_empty() {
            let index = LineIndex::new(&text);
            let offset = index.position_to_offset(selection.start);
            if offset == 0 {
                return;
            }
            selection.start = index.offset_to_position(offset - 1);
        }
        self.edit(Edit::replace(&text, &selection, ""));
    }

    fn move_cursor(&mut self, code: KeyCode, extend: bool) {
        let text = self.session.text();
        let index = LineIndex::new(&text);

        let head = match code {
            KeyCode::Left => {
                index.offset_to_position(index.position_to_offset(self.head).saturating_sub(1))
            }
            KeyCode::Right => index.offset_to_position(index.position_to_offset(self.head) + 1),
            KeyCode::Up => {
                index.clamp(Position::new(self.head.row.saturating_sub(1), self.head.column))
            }
            KeyCode::Down => index.clamp(Position::new(self.head.row + 1, self.head.column)),
            KeyCode::Home => Position::new(self.head.row, 0),
            KeyCode::End => index.clamp(Position::new(self.head.row, usize::MAX)),
            _ => self.head,
        };

        self.anchor = match (extend, self.anchor) {
            (true, Some(anchor)) => Some(anchor),
            (true, None) => Some(self.head),
            (false, _) => None,
        };
        self.head = head;
        let anchor = self.anchor.unwrap_or(head);
        self.session.set_selection(SelectionRange::new(anchor, head));
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.session.key_down(&key_name(key.code));
        self.status.clear();

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char(c) if ctrl => match c {
                'b' => self.run(Cmd::TextBold),
                'e' => self.run(Cmd::TextItalic),
                'k' => self.run(Cmd::TextCode),
                'l' => self.run(Cmd::TextCheckbox),
                'u' => self.run(Cmd::TextBulletedList),
                'n' => self.run(Cmd::TextNumberedList),
                's' => self.save(),
                _ => {}
            },
            KeyCode::Char(c) => self.insert(c.encode_utf8(&mut [0; 4])),
            KeyCode::Enter => self.pending = Some(self.session.press_enter().token),
            KeyCode::Tab => self.pending = Some(self.session.press_tab().token),
            KeyCode::Backspace => self.backspace(),
            code @ (KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Home
            | KeyCode::End) => self.move_cursor(code, shift),
            _ => {}
        }
        true
    }
}

/// Name recorded in the session's key history.
fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Enter => ENTER.to_string(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{other:?}"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .target(log_target())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <markdown-file>", args[0]);
        process::exit(1);
    }
    let path = PathBuf::from(&args[1]);

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => create_default_config(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let mut app = App::new(path, &config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// First run: write the defaults out so there is a file to edit.
fn create_default_config() -> Config {
    let config = Config::default();
    let config_path = Config::config_path();
    match config.save() {
        Ok(()) => log::info!("Created default config file at {}", config_path.display()),
        Err(e) => log::warn!("Failed to create default config file: {e}"),
    }
    config
}

/// Logs go to a file so they don't draw over the editor.
fn log_target() -> env_logger::Target {
    let log_path = env::temp_dir().join("markdown-wrap.log");
    match fs::File::create(log_path) {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(_) => env_logger::Target::Stderr,
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // The edit is on screen now; its selection can follow.
        if app.pending.is_some() {
            app.commit_pending();
            continue;
        }

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let text = app.session.text();
    let index = LineIndex::new(&text);
    let selection = app.session.selection();

    let height = chunks[0].height.saturating_sub(2) as usize;
    if app.head.row < app.scroll {
        app.scroll = app.head.row;
    } else if height > 0 && app.head.row >= app.scroll + height {
        app.scroll = app.head.row + 1 - height;
    }

    let lines: Vec<Line> = (0..index.line_count())
        .map(|row| render_line(index.line(row).unwrap_or_default(), row, &selection))
        .collect();

    let title = format!(" {} ", app.path.display());
    let editor = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((app.scroll as u16, 0));
    f.render_widget(editor, chunks[0]);

    let line = index.line(app.head.row).unwrap_or_default();
    let x = chunks[0].x as usize + 1 + display_width(line, app.head.column);
    let y = chunks[0].y as usize + 1 + app.head.row - app.scroll;
    f.set_cursor_position((x as u16, y as u16));

    let help = if app.status.is_empty() {
        "Esc: Quit | Ctrl+S: Save | Ctrl+B/E/K: Bold/Italic/Code | \
         Ctrl+L/U/N: Checkbox/Bullet/Numbered"
    } else {
        app.status.as_str()
    };
    f.render_widget(Paragraph::new(Line::from(help)), chunks[1]);
}

/// One buffer row with the selected columns highlighted.
fn render_line<'a>(line: &'a str, row: usize, selection: &SelectionRange) -> Line<'a> {
    let columns = line.chars().count();
    let selected_row =
        !selection.is_empty() && selection.start.row <= row && row <= selection.end.row;
    let (from, to) = if selected_row {
        let from = if row == selection.start.row {
            selection.start.column
        } else {
            0
        };
        let to = if row == selection.end.row {
            selection.end.column
        } else {
            columns
        };
        (from.min(columns), to.min(columns))
    } else {
        (columns, columns)
    };

    let byte = |column: usize| {
        line.char_indices()
            .nth(column)
            .map_or(line.len(), |(i, _)| i)
    };
    let (from_byte, to_byte) = (byte(from), byte(to.max(from)));
    let highlight = Style::default().bg(Color::Yellow).fg(Color::Black);

    Line::from(vec![
        Span::raw(expand_tabs(&line[..from_byte])),
        Span::styled(expand_tabs(&line[from_byte..to_byte]), highlight),
        Span::raw(expand_tabs(&line[to_byte..])),
    ])
}

fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}

fn display_width(line: &str, column: usize) -> usize {
    line.chars()
        .take(column)
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}
