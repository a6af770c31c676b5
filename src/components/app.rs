use super::{
    board_view::BoardView,
    charset_dialog::{CharSetDialog, CharSetOption},
};
use crate::charsets::Catalog;
use crate::constants::APPLIED_CHARSET_KEY;
use crate::model::{BoardAction, BoardState};
use crate::util::local_storage;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let board = use_reducer(|| {
        let catalog = Catalog::builtin();
        match local_storage().and_then(|s| s.get_item(APPLIED_CHARSET_KEY).ok().flatten()) {
            Some(id) => BoardState::with_applied(catalog, &id),
            None => BoardState::new(catalog),
        }
    });
    let show_dialog = use_state(|| false);
    let selected = use_state(|| board.applied_id.clone());

    // Persist the applied set (layout itself is not kept across sessions)
    {
        let applied = board.applied_id.clone();
        use_effect_with(applied, move |id| {
            if let Some(store) = local_storage() {
                let _ = store.set_item(APPLIED_CHARSET_KEY, id);
            }
            || ()
        });
    }

    let open_dialog = {
        let show_dialog = show_dialog.clone();
        let selected = selected.clone();
        let board = board.clone();
        Callback::from(move |()| {
            selected.set(board.applied_id.clone());
            show_dialog.set(true);
        })
    };
    let close_dialog = {
        let show_dialog = show_dialog.clone();
        Callback::from(move |()| show_dialog.set(false))
    };
    let select = {
        let selected = selected.clone();
        Callback::from(move |id: String| selected.set(id))
    };
    let apply = {
        let board = board.clone();
        let selected = selected.clone();
        let show_dialog = show_dialog.clone();
        Callback::from(move |()| {
            board.dispatch(BoardAction::ApplyCharSet((*selected).clone()));
            show_dialog.set(false);
        })
    };

    let options: Vec<CharSetOption> = board
        .catalog()
        .sets()
        .iter()
        .map(|s| CharSetOption {
            id: s.id.clone(),
            name: s.name.clone(),
        })
        .collect();

    html! {<div style="position:relative; width:100vw; height:100vh; color:#fafafa; font-family:sans-serif;">
        <BoardView board={board.clone()} on_open_charsets={open_dialog} />
        <CharSetDialog show={*show_dialog} options={options} selected={(*selected).clone()} on_select={select} on_apply={apply} on_close={close_dialog} />
    </div>}
}
