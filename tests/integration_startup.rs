//! Integration test to ensure a session can start up without errors.

use delve::{
    AdventureSession, Command, DelveResult, Difficulty, InputHandler, PlayerInput, RoomId,
    SessionPhase,
};

#[test]
fn test_basic_startup() -> DelveResult<()> {
    let mut session = AdventureSession::new(12345);
    let welcome = session.begin()?;
    assert!(welcome.contains("Enter difficulty (1-3)"));

    let outcome = session.select_difficulty(Difficulty::Normal)?;
    assert_eq!(outcome.phase, SessionPhase::Running);
    assert!(outcome.message.contains("75 Power Points"));

    // The start room is entered as part of selection
    let encounter = outcome.encounter.expect("start room encounter");
    assert!(encounter.first_visit);
    assert_eq!(encounter.room, RoomId::origin());
    assert!(!encounter.depleted);

    let level = session.level()?;
    assert_eq!(level.number, 1);
    assert!(level.is_solvable());
    assert_eq!(session.player()?.location, Some(RoomId::origin()));
    assert_eq!(session.turn, 0);

    Ok(())
}

#[test]
fn test_text_input_drives_session() -> DelveResult<()> {
    let mut session = AdventureSession::new(3);
    let handler = InputHandler::new();
    session.begin()?;

    match handler.parse_line("1", session.phase)? {
        PlayerInput::SelectDifficulty(difficulty) => {
            session.select_difficulty(difficulty)?;
        }
        other => panic!("unexpected input {:?}", other),
    }
    assert_eq!(session.player()?.power, 100);

    for line in ["look", "inv", "status", "map", "help", "hint"] {
        match handler.parse_line(line, session.phase)? {
            PlayerInput::Command(command) => {
                let outcome = session.execute(command)?;
                assert!(!outcome.message.is_empty(), "{}", line);
            }
            other => panic!("unexpected input {:?}", other),
        }
    }
    assert_eq!(session.turn, 6);

    let quit = session.execute(Command::Quit)?;
    assert_eq!(quit.phase, SessionPhase::Ended);
    assert!(quit.message.contains("Final Score"));
    Ok(())
}
