// Scenes shipped with the toolkit

use super::{SceneTemplate, SceneType};
use std::f64::consts::PI;

const NO_YAW: [f64; 2] = [0.0, 0.0];
const FACING_ROBOT: [f64; 2] = [PI, PI];

pub fn builtin_scenes() -> Vec<SceneTemplate> {
    vec![
        kitchen_scene1(),
        kitchen_scene2(),
        living_room_scene1(),
        study_scene1(),
        floor_scene1(),
    ]
}

/// Bowl and plate next to a three-drawer cabinet.
fn kitchen_scene1() -> SceneTemplate {
    SceneTemplate::new("kitchen_scene1", SceneType::Kitchen)
        .with_fixture("wooden_cabinet", 1)
        .with_object("akita_black_bowl", 1)
        .with_object("plate", 1)
        .with_workspace_region([0.0, -0.30], "wooden_cabinet_init_region", 0.01, FACING_ROBOT)
        .with_workspace_region([0.0, 0.0], "akita_black_bowl_init_region", 0.025, NO_YAW)
        .with_workspace_region([0.0, 0.25], "plate_init_region", 0.025, NO_YAW)
        .with_object_region("wooden_cabinet_1", "top_side")
        .with_object_region("wooden_cabinet_1", "top_region")
        .with_object_region("wooden_cabinet_1", "middle_region")
        .with_object_region("wooden_cabinet_1", "bottom_region")
        .placed("akita_black_bowl_1", "kitchen_table_akita_black_bowl_init_region")
        .placed("plate_1", "kitchen_table_plate_init_region")
        .placed("wooden_cabinet_1", "kitchen_table_wooden_cabinet_init_region")
}

/// Two bowls, a plate and a stove.
fn kitchen_scene2() -> SceneTemplate {
    SceneTemplate::new("kitchen_scene2", SceneType::Kitchen)
        .with_fixture("flat_stove", 1)
        .with_object("akita_black_bowl", 2)
        .with_object("plate", 1)
        .with_workspace_region([-0.21, 0.2], "flat_stove_init_region", 0.01, NO_YAW)
        .with_workspace_region([0.05, -0.1], "akita_black_bowl_init_region", 0.025, NO_YAW)
        .with_workspace_region([0.05, 0.1], "akita_black_bowl_back_region", 0.025, NO_YAW)
        .with_workspace_region([0.1, 0.25], "plate_init_region", 0.025, NO_YAW)
        .with_object_region("flat_stove_1", "cook_region")
        .placed("akita_black_bowl_1", "kitchen_table_akita_black_bowl_init_region")
        .placed("akita_black_bowl_2", "kitchen_table_akita_black_bowl_back_region")
        .placed("plate_1", "kitchen_table_plate_init_region")
        .placed("flat_stove_1", "kitchen_table_flat_stove_init_region")
}

/// Groceries and a basket on a low table.
fn living_room_scene1() -> SceneTemplate {
    SceneTemplate::new("living_room_scene1", SceneType::LivingRoom)
        .with_object("alphabet_soup", 1)
        .with_object("cream_cheese", 1)
        .with_object("tomato_sauce", 1)
        .with_object("ketchup", 1)
        .with_object("basket", 1)
        .with_workspace_region([-0.1, -0.2], "alphabet_soup_init_region", 0.025, NO_YAW)
        .with_workspace_region([0.0, -0.2], "cream_cheese_init_region", 0.025, NO_YAW)
        .with_workspace_region([0.1, -0.2], "tomato_sauce_init_region", 0.025, NO_YAW)
        .with_workspace_region([0.1, 0.0], "ketchup_init_region", 0.025, NO_YAW)
        .with_workspace_region([-0.05, 0.15], "basket_init_region", 0.01, NO_YAW)
        .with_object_region("basket_1", "contain_region")
        .placed("alphabet_soup_1", "living_room_table_alphabet_soup_init_region")
        .placed("cream_cheese_1", "living_room_table_cream_cheese_init_region")
        .placed("tomato_sauce_1", "living_room_table_tomato_sauce_init_region")
        .placed("ketchup_1", "living_room_table_ketchup_init_region")
        .placed("basket_1", "living_room_table_basket_init_region")
}

/// Books and a desk caddy.
fn study_scene1() -> SceneTemplate {
    SceneTemplate::new("study_scene1", SceneType::Study)
        .with_object("black_book", 1)
        .with_object("yellow_book", 1)
        .with_object("desk_caddy", 1)
        .with_workspace_region([0.0, -0.15], "black_book_init_region", 0.02, NO_YAW)
        .with_workspace_region([0.1, -0.15], "yellow_book_init_region", 0.02, NO_YAW)
        .with_workspace_region([0.0, 0.2], "desk_caddy_init_region", 0.01, FACING_ROBOT)
        .with_object_region("desk_caddy_1", "back_contain_region")
        .with_object_region("desk_caddy_1", "front_contain_region")
        .placed("black_book_1", "study_table_black_book_init_region")
        .placed("yellow_book_1", "study_table_yellow_book_init_region")
        .placed("desk_caddy_1", "study_table_desk_caddy_init_region")
}

/// Pick-and-place into a basket on the floor.
fn floor_scene1() -> SceneTemplate {
    SceneTemplate::new("floor_scene1", SceneType::Floor)
        .with_object("alphabet_soup", 1)
        .with_object("cream_cheese", 1)
        .with_object("ketchup", 1)
        .with_object("basket", 1)
        .with_workspace_region([-0.1, -0.1], "alphabet_soup_init_region", 0.025, NO_YAW)
        .with_workspace_region([0.0, -0.1], "cream_cheese_init_region", 0.025, NO_YAW)
        .with_workspace_region([0.1, -0.1], "ketchup_init_region", 0.025, NO_YAW)
        .with_workspace_region([0.0, 0.2], "basket_init_region", 0.01, NO_YAW)
        .with_object_region("basket_1", "contain_region")
        .placed("alphabet_soup_1", "floor_alphabet_soup_init_region")
        .placed("cream_cheese_1", "floor_cream_cheese_init_region")
        .placed("ketchup_1", "floor_ketchup_init_region")
        .placed("basket_1", "floor_basket_init_region")
}
