//! Command definitions

/// Commands accepted at the interactive prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// PWD - Print the remembered working directory
    Pwd,

    /// CD - Change remote directory
    Cd,

    /// LS - List remote entries matching an optional pattern
    Ls,

    /// PUT - Upload one local file
    Put,

    /// HELP - Show available commands
    Help,

    /// GET - Download one remote file
    Get,

    /// MGET - Download every remote entry matching a pattern
    Mget,

    /// MPUT - Upload every local file matching a pattern
    Mput,

    /// RECONNECT - Recycle the server connection
    Reconnect,

    /// Anything not in the whitelist
    Bad,
}

impl Command {
    /// Recognised commands in their declared order
    pub const ALL: [Command; 9] = [
        Command::Pwd,
        Command::Cd,
        Command::Ls,
        Command::Put,
        Command::Help,
        Command::Get,
        Command::Mget,
        Command::Mput,
        Command::Reconnect,
    ];

    /// The word typed at the prompt
    pub fn name(&self) -> &'static str {
        match self {
            Command::Pwd => "pwd",
            Command::Cd => "cd",
            Command::Ls => "ls",
            Command::Put => "put",
            Command::Help => "help",
            Command::Get => "get",
            Command::Mget => "mget",
            Command::Mput => "mput",
            Command::Reconnect => "reconnect",
            Command::Bad => "bad",
        }
    }

    /// Look up a whitelisted command by its (lowercase) word
    pub fn from_word(word: &str) -> Option<Command> {
        Self::ALL.iter().copied().find(|cmd| cmd.name() == word)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name().to_uppercase())
    }
}
