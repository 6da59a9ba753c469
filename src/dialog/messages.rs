//! User-facing texts.

use crate::exercises::ExerciseId;

pub const WELCOME: &str = "Привет! Я бот-тренажёр с задачами на массивы.\n\
Выберите задание в меню ниже. Внутри задания можно ввести данные вручную, \
сгенерировать их случайно, выполнить расчёт и посмотреть результат.";

pub const HELP: &str = "Как пользоваться ботом:\n\
1. Выберите задание: «Задание 1», «Задание 4» или «Задание 5».\n\
2. Отправьте данные в указанном формате или нажмите «Сгенерировать».\n\
3. Нажмите «Выполнить», затем «Результат», чтобы увидеть ответ ещё раз.\n\
«Назад» возвращает в главное меню, /start начинает заново.";

pub const MAIN_MENU: &str = "Главное меню:";
pub const USE_MENU: &str = "Используйте кнопки меню";
pub const CHOOSE_TASK_FIRST: &str = "Сначала выберите задание в меню!";
pub const NEED_DATA: &str = "Сначала введите или сгенерируйте данные!";
pub const NOT_COMPUTED: &str = "Сначала выполните расчет!";
pub const ENTER_OPERATION: &str = "Введите операцию (+ или -):";

pub fn task_details(exercise: ExerciseId) -> &'static str {
    match exercise {
        ExerciseId::Reconcile => {
            "Даны два массива одинаковой длины. Первый сортируется по убыванию, \
второй по возрастанию. Элементы складываются попарно, пара равных чисел даёт 0. \
Ответ сортируется по возрастанию.\n\
Ввод: '1 2 3;4 5 6'"
        }
        ExerciseId::Digits => {
            "Числа записаны массивами цифр: [1, 2, 3] означает 123. \
Выполняется сложение или вычитание, ответ тоже массив цифр \
(со знаком '-' впереди, если он отрицательный).\n\
Ввод: '1 2 3|4 5 6;+'"
        }
        ExerciseId::Subarray => {
            "Дан массив и число. Нужно посчитать, сколько непрерывных подмассивов \
имеют сумму, равную этому числу.\n\
Ввод: '1 2 3 4;5'"
        }
    }
}
